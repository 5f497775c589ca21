use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AgentError {
    #[error("two-stage state requires a non-empty state vector")]
    EmptyTwoStageState,

    #[error("state vector has length {got}, expected {expected}")]
    StateLengthMismatch {
        expected: usize,
        got:      usize,
    },

    #[error("agent id space exhausted")]
    IdsExhausted,
}

pub type AgentResult<T> = Result<T, AgentError>;
