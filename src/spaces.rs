use crate::{rng::RandomSource, Discrete};
use std::ops::Range;

/// The set `{0, 1, ..., n - 1}`.
/// Refer: https://gymnasium.farama.org/api/spaces/fundamental/#discrete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiscreteSpace {
    pub n: usize,
}

impl DiscreteSpace {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    pub fn contains(&self, x: Discrete) -> bool {
        x < self.n
    }

    /// Uniform element of the space, `None` when the space is empty.
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<Discrete> {
        (self.n > 0).then(|| rng.below(self.n))
    }

    pub fn iter(&self) -> Range<Discrete> {
        0..self.n
    }
}
