use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{Algorithm, ElementState, Position, RunPhase, RunToken},
    error::EngineErrorPayload,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Movement {
    Swap { a: Position, b: Position },
    Shift { from: Position, to: Position },
}

impl Movement {
    pub fn swap(a: Position, b: Position) -> Self {
        Movement::Swap { a, b }
    }

    pub fn shift(from: Position, to: Position) -> Self {
        Movement::Shift { from, to }
    }

    pub fn span(&self) -> Vec<Position> {
        match *self {
            Movement::Swap { a, b } => vec![a, b],
            Movement::Shift { from, to } => {
                let (low, high) = if from <= to { (from.0, to.0) } else { (to.0, from.0) };
                (low..=high).map(Position).collect()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub comparisons: u64,
    pub swaps: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ViewEvent {
    SequenceLoaded {
        values: Vec<i64>,
    },
    PhaseChanged {
        phase: RunPhase,
        algorithm: Algorithm,
    },
    RunStarted {
        token: RunToken,
        algorithm: Algorithm,
    },
    StateChanged {
        position: Position,
        state: ElementState,
        settled: bool,
    },
    TransitionStarted {
        token: RunToken,
        movement: Movement,
        duration_ms: u64,
    },
    ValuesCommitted {
        token: RunToken,
        movement: Movement,
        values: Vec<i64>,
    },
    TransitionFinished {
        token: RunToken,
        movement: Movement,
    },
    MetricsUpdated(MetricsSnapshot),
    RunFinished {
        token: RunToken,
        algorithm: Algorithm,
        metrics: MetricsSnapshot,
    },
    RunCancelled {
        token: RunToken,
        algorithm: Algorithm,
    },
    Error(EngineErrorPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ControlRequest {
    Load { values: Vec<i64> },
    Start { algorithm: Algorithm },
    Reset,
    SelectAlgorithm { algorithm: Algorithm },
    SetSpeed { slider: u32 },
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
