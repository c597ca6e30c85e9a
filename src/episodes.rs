use crate::{env::FiniteMdpEnv, error::*, spaces::DiscreteSpace, Discrete};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

pub trait Policy {
    fn policy(&self, s: Discrete, rng: &mut StdRng) -> Discrete;
}

/// Picks actions uniformly from the action space, whatever the state.
pub struct RandomPolicy {
    pub action_space: DiscreteSpace,
}

impl RandomPolicy {
    pub fn new(action_space: DiscreteSpace) -> Self {
        Self { action_space }
    }
}

impl Policy for RandomPolicy {
    fn policy(&self, _s: Discrete, rng: &mut StdRng) -> Discrete {
        // An empty action space yields action 0, which the environment rejects.
        self.action_space.sample(rng).unwrap_or_default()
    }
}

/// One transition of an episode: action `a` taken in `s` paid `r` and led to `s_next`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeEvent {
    pub s: Discrete,
    pub a: Discrete,
    pub r: f64,
    pub s_next: Discrete,
    pub done: bool,
}

pub trait EpisodeGenerator {
    /// Rolls out `n` complete episodes under `policy`. `seed` drives the policy's
    /// own generator.
    fn generate(
        &mut self,
        n: usize,
        policy: &dyn Policy,
        seed: u64,
    ) -> MdpResult<Vec<Vec<EpisodeEvent>>>;
}

impl EpisodeGenerator for FiniteMdpEnv {
    fn generate(
        &mut self,
        n: usize,
        policy: &dyn Policy,
        seed: u64,
    ) -> MdpResult<Vec<Vec<EpisodeEvent>>> {
        let rng = &mut StdRng::seed_from_u64(seed);

        let mut eps = Vec::with_capacity(n);
        for _ in 0..n {
            let mut ep = vec![];
            let mut s = self.reset();
            loop {
                let a = policy.policy(s, rng);
                let si = self.step(a)?;
                ep.push(EpisodeEvent {
                    s,
                    a,
                    r: si.reward,
                    s_next: si.state,
                    done: si.done,
                });
                if si.done {
                    break;
                }

                s = si.state;
            }
            eps.push(ep);
        }

        Ok(eps)
    }
}
