use crate::{config::*, error::*, mdps::*, rng::np_random, spaces::DiscreteSpace, Discrete};
use rand::rngs::StdRng;
use tracing::debug;

/// Episode controller around a finite MDP.
///
/// Owns the model, the configuration it was built from, a step counter and its
/// own random generator. Episodes are cut off once more than
/// [`FiniteMdpEnv::MAX_STEPS`] steps have been taken. `Clone` is a deep copy,
/// generator state included.
#[derive(Debug, Clone)]
pub struct FiniteMdpEnv {
    config: MdpConfig,
    mdp: Mdp,
    steps: usize,
    np_random: StdRng,
}

impl FiniteMdpEnv {
    pub const MAX_STEPS: usize = 10;

    /// Single-state, single-action deterministic MDP with zero reward.
    pub fn default_config() -> MdpConfig {
        MdpConfig::deterministic(vec![vec![0]], vec![vec![0.]])
    }

    pub fn new() -> MdpResult<Self> {
        Self::from_config(Self::default_config(), None)
    }

    /// Builds the environment from `config`. Without a `seed` one is drawn from
    /// entropy.
    pub fn from_config(config: MdpConfig, seed: Option<u64>) -> MdpResult<Self> {
        let (mut np_random, seed) = np_random(seed);
        let mdp = Mdp::from_config(&config, &mut np_random)?;
        debug!(seed, mode = %mdp.mode(), "created finite mdp environment");

        let mut env = Self {
            config,
            mdp,
            steps: 0,
            np_random,
        };
        env.reset();
        Ok(env)
    }

    pub fn config(&self) -> &MdpConfig {
        &self.config
    }

    pub fn mdp(&self) -> &Mdp {
        &self.mdp
    }

    pub fn mdp_mut(&mut self) -> &mut Mdp {
        &mut self.mdp
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn observation_space(&self) -> DiscreteSpace {
        DiscreteSpace::new(self.mdp.n_s())
    }

    pub fn action_space(&self) -> DiscreteSpace {
        DiscreteSpace::new(self.mdp.n_a())
    }

    /// Reseeds the generator, returning the seed actually used.
    pub fn seed(&mut self, seed: Option<u64>) -> Vec<u64> {
        let (np_random, seed) = np_random(seed);
        self.np_random = np_random;
        debug!(seed, "reseeded finite mdp environment");
        vec![seed]
    }

    /// Merges `partial` into the stored configuration and rebuilds the model from
    /// the result. Nothing changes if the rebuild fails.
    pub fn configure(&mut self, partial: &MdpConfig) -> MdpResult<()> {
        let config = self.config.merge(partial);
        let mdp = Mdp::from_config(&config, &mut self.np_random)?;
        debug!(mode = %mdp.mode(), n_s = mdp.n_s(), n_a = mdp.n_a(), "reconfigured environment");

        self.config = config;
        self.mdp = mdp;
        Ok(())
    }

    /// Deep copy whose configuration is replaced by `config` and whose model has
    /// `config` applied as a partial update. `self` is never modified.
    pub fn copy_with_config(&self, config: MdpConfig) -> MdpResult<Self> {
        let mut copy = self.clone();
        copy.mdp.update(&config)?;
        copy.config = config;
        debug!(steps = copy.steps, "copied environment with new config");

        Ok(copy)
    }

    pub fn reset(&mut self) -> Discrete {
        self.steps = 0;
        self.mdp.reset()
    }

    /// Steps the model. `done` is also forced once the counter of steps already
    /// taken exceeds `MAX_STEPS`, so the 12th step of an episode is always the
    /// last.
    pub fn step(&mut self, action: Discrete) -> MdpResult<StepInfo> {
        let mut step = self.mdp.step(action, &mut self.np_random)?;
        if !step.done && self.steps > Self::MAX_STEPS {
            debug!(steps = self.steps, "episode cut off at step limit");
        }

        step.done = step.done || self.steps > Self::MAX_STEPS;
        self.steps += 1;
        Ok(step)
    }
}
