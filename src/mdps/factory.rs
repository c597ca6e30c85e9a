use super::{DeterministicMdp, Mdp, StochasticMdp};
use crate::{config::*, error::*, rng::RandomSource};
use tracing::debug;

impl Mdp {
    /// Builds the variant named by `config.mode`. Missing tables default to empty
    /// and a missing `terminal` to all non-terminal. With `random` set, the tables
    /// are randomized from `rng` right after construction.
    pub fn from_config<R: RandomSource + ?Sized>(config: &MdpConfig, rng: &mut R) -> MdpResult<Self> {
        let mode = config
            .mode
            .ok_or_else(|| MdpError::Configuration("missing MDP mode".into()))?;

        let mut mdp = match mode {
            MdpMode::Deterministic => Mdp::Deterministic(DeterministicMdp::from_config(config)?),
            MdpMode::Stochastic => Mdp::Stochastic(StochasticMdp::from_config(config)?),
        };
        debug!(%mode, n_s = mdp.n_s(), n_a = mdp.n_a(), "built mdp");

        if config.random.unwrap_or(false) {
            mdp.randomize(rng);
            debug!(%mode, "randomized mdp");
        }

        Ok(mdp)
    }

    /// Converts to the stochastic variant. A stochastic model is returned as is.
    pub fn into_stochastic(self) -> Mdp {
        match self {
            Mdp::Deterministic(mdp) => Mdp::Stochastic(StochasticMdp::from_deterministic(&mdp)),
            stochastic => stochastic,
        }
    }
}
