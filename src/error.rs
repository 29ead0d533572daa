use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    AuthRejected(String),
    #[error("{0} requires a faculty session")]
    Forbidden(&'static str),
}
