//! Simulation of finite Markov Decision Processes, deterministic or stochastic,
//! behind a gym-style episode controller.

pub mod config;
pub mod env;
pub mod episodes;
pub mod error;
pub mod mdps;
pub mod rng;
pub mod spaces;

pub use config::*;
pub use env::*;
pub use episodes::*;
pub use error::*;
pub use mdps::*;
pub use rng::*;
pub use spaces::*;

pub type Discrete = usize;
