use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position(pub usize);

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunToken(pub Uuid);

impl RunToken {
    pub fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RunToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Bubble,
    Selection,
    Insertion,
    Quick,
    Merge,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Insertion,
        Algorithm::Quick,
        Algorithm::Merge,
    ];

    pub fn index(self) -> usize {
        match self {
            Algorithm::Bubble => 0,
            Algorithm::Selection => 1,
            Algorithm::Insertion => 2,
            Algorithm::Quick => 3,
            Algorithm::Merge => 4,
        }
    }

    pub fn from_index(index: usize) -> Result<Self, EngineError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(EngineError::AlgorithmIndex(index))
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Selection => "selection",
            Algorithm::Insertion => "insertion",
            Algorithm::Quick => "quick",
            Algorithm::Merge => "merge",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        if let Ok(index) = normalized.parse::<usize>() {
            return Self::from_index(index);
        }

        let name = normalized
            .strip_suffix("sort")
            .map(|s| s.trim_end_matches(['_', '-', ' ']))
            .unwrap_or(normalized.as_str());

        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == name)
            .ok_or_else(|| EngineError::UnknownAlgorithm(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    Comparing,
    Swapping,
    Moving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementState {
    #[default]
    Neutral,
    Comparing,
    Swapping,
    Moving,
    Settled,
}

impl From<Highlight> for ElementState {
    fn from(value: Highlight) -> Self {
        match value {
            Highlight::Comparing => ElementState::Comparing,
            Highlight::Swapping => ElementState::Swapping,
            Highlight::Moving => ElementState::Moving,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    #[default]
    Idle,
    Running,
    Resetting,
}

/// What the controller currently considers live. Published to every
/// suspended step; a step acts only while `admits` holds for its own token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunStatus {
    pub phase: RunPhase,
    pub algorithm: Algorithm,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<RunToken>,
}

impl RunStatus {
    pub fn admits(&self, token: RunToken, algorithm: Algorithm) -> bool {
        self.phase == RunPhase::Running && self.algorithm == algorithm && self.token == Some(token)
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
