use super::{deterministic::DeterministicMdp, tables::*, StepInfo};
use crate::{config::*, error::*, rng::RandomSource, Discrete};
use itertools::iproduct;
use ndarray::{s, Array1, Array2, Array3};
use tracing::trace;

/// How far a transition row may sum away from one and still be sampled.
const PROBABILITY_SUM_TOLERANCE: f64 = 1e-8;

/// MDP whose transition table holds, for each `(state, action)`, a distribution
/// over next states.
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticMdp {
    pub(crate) state: Discrete,
    pub(crate) transition: Array3<f64>,
    pub(crate) reward: Array2<f64>,
    pub(crate) terminal: Array1<bool>,
}

impl StochasticMdp {
    /// `transition` is `S x A x S`, `reward` is `S x A`, `terminal` has `S` flags.
    /// Rows of `transition` are not checked here; a row that does not sum to one
    /// fails when it is stepped through.
    pub fn new(
        transition: Array3<f64>,
        reward: Array2<f64>,
        terminal: Option<Array1<bool>>,
    ) -> MdpResult<Self> {
        let terminal = match terminal {
            Some(t) if !t.is_empty() => t,
            _ => Array1::from_elem(transition.dim().0, false),
        };
        Self::check(&transition, &reward, &terminal)?;

        Ok(Self {
            state: 0,
            transition,
            reward,
            terminal,
        })
    }

    pub(crate) fn from_config(config: &MdpConfig) -> MdpResult<Self> {
        let transition = stochastic_table(config.transition.as_ref())?;
        let reward = to_array2(config.reward.as_deref().unwrap_or_default(), "reward")?;
        let terminal = terminal_or_default(config.terminal.as_deref(), transition.dim().0);

        Self::new(transition, reward, Some(terminal))
    }

    /// Equivalent stochastic MDP: every `(s, a)` puts probability one on the
    /// deterministic successor. Rewards and terminal flags are carried over.
    pub fn from_deterministic(mdp: &DeterministicMdp) -> Self {
        let (n_s, n_a) = mdp.transition.dim();
        let mut transition = Array3::zeros((n_s, n_a, n_s));
        for (s, a) in iproduct!(0..n_s, 0..n_a) {
            transition[[s, a, mdp.transition[[s, a]]]] = 1.;
        }

        Self {
            state: 0,
            transition,
            reward: mdp.reward.clone(),
            terminal: mdp.terminal.clone(),
        }
    }

    pub fn state(&self) -> Discrete {
        self.state
    }

    pub fn n_s(&self) -> usize {
        self.transition.dim().0
    }

    pub fn n_a(&self) -> usize {
        self.transition.dim().1
    }

    pub fn transition(&self) -> &Array3<f64> {
        &self.transition
    }

    pub fn reward(&self) -> &Array2<f64> {
        &self.reward
    }

    pub fn terminal(&self) -> &Array1<bool> {
        &self.terminal
    }

    pub fn reset(&mut self) -> Discrete {
        self.state = 0;
        self.state
    }

    /// Samples the next state from `transition[state, action, ..]`, which must be a
    /// probability distribution. Reward and `done` are read at the state being left.
    pub fn step<R: RandomSource + ?Sized>(
        &mut self,
        action: Discrete,
        rng: &mut R,
    ) -> MdpResult<StepInfo> {
        let s = self.state;
        check_step(s, action, self.n_s(), self.n_a())?;

        let reward = self.reward[[s, action]];
        let done = self.terminal[s];
        let probs = self.transition.slice(s![s, action, ..]).to_vec();
        let total: f64 = probs.iter().sum();
        if !((total - 1.).abs() <= PROBABILITY_SUM_TOLERANCE) {
            return Err(MdpError::InvalidDistribution { state: s, action });
        }
        let next = rng
            .categorical(&probs)
            .ok_or(MdpError::InvalidDistribution { state: s, action })?;
        self.state = next;
        trace!(s, action, next, reward, done, "stochastic step");

        Ok(StepInfo {
            state: self.state,
            reward,
            done,
            info: self.to_config(),
        })
    }

    /// Draws every transition entry independently from `[0, 1)`. Rows are left
    /// unnormalized, so stepping afterwards fails until valid rows are installed.
    pub fn randomize<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.transition.mapv_inplace(|_| rng.uniform());
        self.reward.mapv_inplace(|_| rng.uniform());
    }

    pub fn to_config(&self) -> MdpConfig {
        MdpConfig {
            mode: Some(MdpMode::Stochastic),
            transition: Some(TransitionTable::Stochastic(to_nested3(&self.transition))),
            reward: Some(to_nested2(&self.reward)),
            terminal: Some(self.terminal.to_vec()),
            random: None,
        }
    }

    pub fn update(&mut self, config: &MdpConfig) -> MdpResult<()> {
        let transition = match &config.transition {
            Some(t) => stochastic_table(Some(t))?,
            None => self.transition.clone(),
        };
        let reward = match &config.reward {
            Some(r) => to_array2(r, "reward")?,
            None => self.reward.clone(),
        };
        let terminal = match &config.terminal {
            Some(t) => terminal_or_default(Some(t.as_slice()), transition.dim().0),
            None => self.terminal.clone(),
        };
        Self::check(&transition, &reward, &terminal)?;

        self.transition = transition;
        self.reward = reward;
        self.terminal = terminal;
        Ok(())
    }

    fn check(
        transition: &Array3<f64>,
        reward: &Array2<f64>,
        terminal: &Array1<bool>,
    ) -> MdpResult<()> {
        let (n_s, n_a, n_next) = transition.dim();
        check_common(n_s, n_a, reward, terminal)?;

        if n_next != n_s {
            return Err(MdpError::Shape(format!(
                "transition table is {n_s} x {n_a} x {n_next}, expected {n_s} x {n_a} x {n_s}"
            )));
        }

        Ok(())
    }
}

fn stochastic_table(table: Option<&TransitionTable>) -> MdpResult<Array3<f64>> {
    match table {
        None => Ok(Array3::zeros((0, 0, 0))),
        Some(TransitionTable::Stochastic(rows)) => to_array3(rows, "transition"),
        // `[[], []]` decodes as a two-level table; with no actions it is a valid
        // S x 0 x S table.
        Some(TransitionTable::Deterministic(rows)) if rows.iter().all(Vec::is_empty) => {
            Ok(Array3::zeros((rows.len(), 0, rows.len())))
        }
        Some(TransitionTable::Deterministic(_)) => Err(MdpError::Shape(
            "stochastic mode expects an S x A x S transition table, got S x A".into(),
        )),
    }
}
