pub mod deterministic;
pub mod factory;
pub mod stochastic;
mod tables;

pub use deterministic::DeterministicMdp;
pub use stochastic::StochasticMdp;

use crate::{config::*, error::*, rng::RandomSource, Discrete};
use ndarray::{Array1, Array2};

/// Outcome of a single transition. `info` is the full model snapshot taken after
/// the state has moved.
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    pub state: Discrete,
    pub reward: f64,
    pub done: bool,
    pub info: MdpConfig,
}

/// Finite Markov Decision Process being simulated.
#[derive(Debug, Clone, PartialEq)]
pub enum Mdp {
    Deterministic(DeterministicMdp),
    Stochastic(StochasticMdp),
}

impl Mdp {
    pub fn mode(&self) -> MdpMode {
        match self {
            Mdp::Deterministic(_) => MdpMode::Deterministic,
            Mdp::Stochastic(_) => MdpMode::Stochastic,
        }
    }

    pub fn state(&self) -> Discrete {
        match self {
            Mdp::Deterministic(mdp) => mdp.state(),
            Mdp::Stochastic(mdp) => mdp.state(),
        }
    }

    /// Number of states, `S`.
    pub fn n_s(&self) -> usize {
        match self {
            Mdp::Deterministic(mdp) => mdp.n_s(),
            Mdp::Stochastic(mdp) => mdp.n_s(),
        }
    }

    /// Number of actions, `A`.
    pub fn n_a(&self) -> usize {
        match self {
            Mdp::Deterministic(mdp) => mdp.n_a(),
            Mdp::Stochastic(mdp) => mdp.n_a(),
        }
    }

    pub fn reward(&self) -> &Array2<f64> {
        match self {
            Mdp::Deterministic(mdp) => mdp.reward(),
            Mdp::Stochastic(mdp) => mdp.reward(),
        }
    }

    pub fn terminal(&self) -> &Array1<bool> {
        match self {
            Mdp::Deterministic(mdp) => mdp.terminal(),
            Mdp::Stochastic(mdp) => mdp.terminal(),
        }
    }

    /// Places the model in `state` without taking a transition.
    pub fn set_state(&mut self, state: Discrete) -> MdpResult<()> {
        let n_s = self.n_s();
        if state >= n_s {
            return Err(MdpError::InvalidState { state, n_s });
        }

        match self {
            Mdp::Deterministic(mdp) => mdp.state = state,
            Mdp::Stochastic(mdp) => mdp.state = state,
        }
        Ok(())
    }

    pub fn reset(&mut self) -> Discrete {
        match self {
            Mdp::Deterministic(mdp) => mdp.reset(),
            Mdp::Stochastic(mdp) => mdp.reset(),
        }
    }

    /// Takes `action` from the current state. `rng` is only drawn from by the
    /// stochastic variant. On error the model is left as it was.
    pub fn step<R: RandomSource + ?Sized>(
        &mut self,
        action: Discrete,
        rng: &mut R,
    ) -> MdpResult<StepInfo> {
        match self {
            Mdp::Deterministic(mdp) => mdp.step(action),
            Mdp::Stochastic(mdp) => mdp.step(action, rng),
        }
    }

    pub fn randomize<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        match self {
            Mdp::Deterministic(mdp) => mdp.randomize(rng),
            Mdp::Stochastic(mdp) => mdp.randomize(rng),
        }
    }

    /// Replaces the tables present in `config`, keeping the others. `mode` and
    /// `random` are ignored.
    pub fn update(&mut self, config: &MdpConfig) -> MdpResult<()> {
        match self {
            Mdp::Deterministic(mdp) => mdp.update(config),
            Mdp::Stochastic(mdp) => mdp.update(config),
        }
    }

    pub fn to_config(&self) -> MdpConfig {
        match self {
            Mdp::Deterministic(mdp) => mdp.to_config(),
            Mdp::Stochastic(mdp) => mdp.to_config(),
        }
    }
}

impl From<&Mdp> for MdpConfig {
    fn from(mdp: &Mdp) -> Self {
        mdp.to_config()
    }
}

impl From<DeterministicMdp> for Mdp {
    fn from(mdp: DeterministicMdp) -> Self {
        Mdp::Deterministic(mdp)
    }
}

impl From<StochasticMdp> for Mdp {
    fn from(mdp: StochasticMdp) -> Self {
        Mdp::Stochastic(mdp)
    }
}
