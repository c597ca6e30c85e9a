use super::{tables::*, StepInfo};
use crate::{config::*, error::*, rng::RandomSource, Discrete};
use ndarray::{Array1, Array2};
use tracing::trace;

/// MDP whose transition table maps each `(state, action)` to exactly one next state.
#[derive(Debug, Clone, PartialEq)]
pub struct DeterministicMdp {
    pub(crate) state: Discrete,
    pub(crate) transition: Array2<Discrete>,
    pub(crate) reward: Array2<f64>,
    pub(crate) terminal: Array1<bool>,
}

impl DeterministicMdp {
    /// `transition` and `reward` are `S x A`, `terminal` has `S` flags. A missing
    /// or empty `terminal` means no state is terminal.
    pub fn new(
        transition: Array2<Discrete>,
        reward: Array2<f64>,
        terminal: Option<Array1<bool>>,
    ) -> MdpResult<Self> {
        let terminal = match terminal {
            Some(t) if !t.is_empty() => t,
            _ => Array1::from_elem(transition.nrows(), false),
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
        let transition = deterministic_table(config.transition.as_ref())?;
        let reward = to_array2(config.reward.as_deref().unwrap_or_default(), "reward")?;
        let terminal = terminal_or_default(config.terminal.as_deref(), transition.nrows());

        Self::new(transition, reward, Some(terminal))
    }

    pub fn state(&self) -> Discrete {
        self.state
    }

    pub fn n_s(&self) -> usize {
        self.transition.nrows()
    }

    pub fn n_a(&self) -> usize {
        self.transition.ncols()
    }

    pub fn transition(&self) -> &Array2<Discrete> {
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

    /// Reward and `done` are read at the state being left, then the state moves.
    pub fn step(&mut self, action: Discrete) -> MdpResult<StepInfo> {
        let s = self.state;
        check_step(s, action, self.n_s(), self.n_a())?;

        let reward = self.reward[[s, action]];
        let done = self.terminal[s];
        self.state = self.transition[[s, action]];
        trace!(s, action, next = self.state, reward, done, "deterministic step");

        Ok(StepInfo {
            state: self.state,
            reward,
            done,
            info: self.to_config(),
        })
    }

    pub fn randomize<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        let n_s = self.n_s();
        self.transition.mapv_inplace(|_| rng.below(n_s));
        self.reward.mapv_inplace(|_| rng.uniform());
    }

    pub fn to_config(&self) -> MdpConfig {
        MdpConfig {
            mode: Some(MdpMode::Deterministic),
            transition: Some(TransitionTable::Deterministic(to_nested2(&self.transition))),
            reward: Some(to_nested2(&self.reward)),
            terminal: Some(self.terminal.to_vec()),
            random: None,
        }
    }

    pub fn update(&mut self, config: &MdpConfig) -> MdpResult<()> {
        let transition = match &config.transition {
            Some(t) => deterministic_table(Some(t))?,
            None => self.transition.clone(),
        };
        let reward = match &config.reward {
            Some(r) => to_array2(r, "reward")?,
            None => self.reward.clone(),
        };
        let terminal = match &config.terminal {
            Some(t) => terminal_or_default(Some(t.as_slice()), transition.nrows()),
            None => self.terminal.clone(),
        };
        Self::check(&transition, &reward, &terminal)?;

        self.transition = transition;
        self.reward = reward;
        self.terminal = terminal;
        Ok(())
    }

    fn check(
        transition: &Array2<Discrete>,
        reward: &Array2<f64>,
        terminal: &Array1<bool>,
    ) -> MdpResult<()> {
        let (n_s, n_a) = transition.dim();
        check_common(n_s, n_a, reward, terminal)?;

        if let Some(((s, a), next)) = transition.indexed_iter().find(|(_, next)| **next >= n_s) {
            return Err(MdpError::Shape(format!(
                "transition ({s}, {a}) leads to state {next}, only {n_s} states exist"
            )));
        }

        Ok(())
    }
}

fn deterministic_table(table: Option<&TransitionTable>) -> MdpResult<Array2<Discrete>> {
    match table {
        None => Ok(Array2::from_elem((0, 0), 0)),
        Some(TransitionTable::Deterministic(rows)) => to_array2(rows, "transition"),
        Some(TransitionTable::Stochastic(_)) => Err(MdpError::Shape(
            "deterministic mode expects an S x A transition table, got S x A x S".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};
    use rand::prelude::*;

    fn two_state() -> DeterministicMdp {
        DeterministicMdp::new(
            arr2(&[[1], [0]]),
            arr2(&[[5.], [1.]]),
            Some(arr1(&[false, true])),
        )
        .unwrap()
    }

    #[test]
    fn done_reflects_the_state_being_left() {
        let mdp = &mut two_state();
        assert_eq!(mdp.reset(), 0);

        let si = mdp.step(0).unwrap();
        assert_eq!((si.state, si.reward, si.done), (1, 5., false));

        let si = mdp.step(0).unwrap();
        assert_eq!((si.state, si.reward, si.done), (0, 1., true));
    }

    #[test]
    fn step_is_a_function_of_state_and_action() {
        let mdp = two_state();
        let a = mdp.clone().step(0).unwrap();
        let b = mdp.clone().step(0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_action_leaves_the_model_untouched() {
        let mdp = &mut two_state();
        let before = mdp.clone();

        let err = mdp.step(1).unwrap_err();
        assert!(matches!(err, MdpError::InvalidAction { action: 1, n_a: 1 }));
        assert_eq!(*mdp, before);
    }

    #[test]
    fn missing_terminal_defaults_to_non_terminal() {
        let mdp = DeterministicMdp::new(arr2(&[[0, 1], [1, 1]]), arr2(&[[0., 0.], [0., 0.]]), None)
            .unwrap();
        assert_eq!(mdp.terminal(), &arr1(&[false, false]));
    }

    #[test]
    fn rejects_out_of_range_targets() {
        let err = DeterministicMdp::new(arr2(&[[2], [0]]), arr2(&[[0.], [0.]]), None).unwrap_err();
        assert!(matches!(err, MdpError::Shape(_)));
    }

    #[test]
    fn randomize_keeps_shapes_and_ranges() {
        let mdp = &mut DeterministicMdp::new(
            Array2::from_elem((4, 3), 0),
            Array2::zeros((4, 3)),
            None,
        )
        .unwrap();

        mdp.randomize(&mut StdRng::seed_from_u64(2718));

        assert_eq!(mdp.transition().dim(), (4, 3));
        assert_eq!(mdp.reward().dim(), (4, 3));
        assert_eq!(mdp.terminal().len(), 4);
        assert!(mdp.transition().iter().all(|&s| s < 4));
        assert!(mdp.reward().iter().all(|&r| (0.0..1.0).contains(&r)));
    }

    #[test]
    fn update_replaces_only_present_tables() {
        let mdp = &mut two_state();
        mdp.update(&MdpConfig {
            reward: Some(vec![vec![7.], vec![8.]]),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(mdp.reward(), &arr2(&[[7.], [8.]]));
        assert_eq!(mdp.transition(), &arr2(&[[1], [0]]));
        assert_eq!(mdp.terminal(), &arr1(&[false, true]));
    }

    #[test]
    fn rejected_update_changes_nothing() {
        let mdp = &mut two_state();
        let before = mdp.clone();

        let err = mdp
            .update(&MdpConfig {
                transition: Some(TransitionTable::Deterministic(vec![vec![0], vec![0], vec![0]])),
                ..Default::default()
            })
            .unwrap_err();

        assert!(matches!(err, MdpError::Shape(_)));
        assert_eq!(*mdp, before);
    }
}
