use crate::Discrete;
use thiserror::Error;

pub type MdpResult<T> = Result<T, MdpError>;

#[derive(Debug, Error)]
pub enum MdpError {
    /// Missing or unrecognized `mode`, or a configuration that cannot be decoded.
    #[error("invalid MDP configuration: {0}")]
    Configuration(String),

    /// Tables that disagree on the number of states or actions.
    #[error("inconsistent MDP tables: {0}")]
    Shape(String),

    #[error("state {state} is out of range for a state space of size {n_s}")]
    InvalidState { state: Discrete, n_s: usize },

    #[error("action {action} is out of range for an action space of size {n_a}")]
    InvalidAction { action: Discrete, n_a: usize },

    #[error("transition row for state {state}, action {action} is not a usable distribution")]
    InvalidDistribution { state: Discrete, action: Discrete },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for MdpError {
    fn from(e: serde_json::Error) -> Self {
        MdpError::Configuration(e.to_string())
    }
}

impl From<ndarray::ShapeError> for MdpError {
    fn from(e: ndarray::ShapeError) -> Self {
        MdpError::Shape(e.to_string())
    }
}
