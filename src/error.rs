use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid signal: {0}")]
    InvalidSignal(String),

    #[error("Invalid candidate {id}: {reason}")]
    InvalidCandidate { id: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
