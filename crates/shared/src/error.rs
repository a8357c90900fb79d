use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::RunPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidInput,
    Busy,
    OutOfBounds,
    DriverFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineErrorPayload {
    pub code: ErrorCode,
    pub message: String,
}

impl EngineErrorPayload {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("position {position} is outside a sequence of length {len}")]
    PositionOutOfBounds { position: usize, len: usize },
    #[error("cannot {action} while the controller is {phase:?}")]
    Busy {
        action: &'static str,
        phase: RunPhase,
    },
    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),
    #[error("algorithm index {0} is out of range (expected 0..=4)")]
    AlgorithmIndex(usize),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("driver task failed: {0}")]
    DriverTask(String),
}

impl EngineError {
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::PositionOutOfBounds { .. } => ErrorCode::OutOfBounds,
            EngineError::Busy { .. } => ErrorCode::Busy,
            EngineError::UnknownAlgorithm(_)
            | EngineError::AlgorithmIndex(_)
            | EngineError::InvalidInput(_) => ErrorCode::InvalidInput,
            EngineError::DriverTask(_) => ErrorCode::DriverFailure,
        }
    }
}

impl From<&EngineError> for EngineErrorPayload {
    fn from(value: &EngineError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}
