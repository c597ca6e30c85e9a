use crate::Discrete;
use rand::distributions::WeightedIndex;
use rand::prelude::*;

/// Source of the random draws an MDP needs: uniform reals, uniform indices and
/// categorical samples.
///
/// Every [`Rng`] is a `RandomSource`, so a seeded [`StdRng`] can be passed
/// wherever one is expected.
pub trait RandomSource {
    /// Uniform real in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Uniform index in `[0, n)`. `n` must be non-zero.
    fn below(&mut self, n: usize) -> Discrete;

    /// Index drawn with probability proportional to its weight. `None` when the
    /// weights cannot form a distribution (empty, negative, non-finite or all zero).
    fn categorical(&mut self, weights: &[f64]) -> Option<Discrete>;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn below(&mut self, n: usize) -> Discrete {
        self.gen_range(0..n)
    }

    fn categorical(&mut self, weights: &[f64]) -> Option<Discrete> {
        if weights.iter().any(|w| !w.is_finite()) {
            return None;
        }

        let dist = WeightedIndex::new(weights).ok()?;
        Some(dist.sample(self))
    }
}

/// Build a generator from `seed`, drawing a fresh seed from entropy when none is
/// given. Returns the generator together with the seed it was built from.
pub fn np_random(seed: Option<u64>) -> (StdRng, u64) {
    let seed = seed.unwrap_or_else(|| thread_rng().gen());
    (StdRng::seed_from_u64(seed), seed)
}
