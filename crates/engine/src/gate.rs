use shared::{
    domain::{Highlight, Position},
    error::EngineError,
};
use tracing::trace;

use crate::context::{Liveness, RunContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Greater,
    Less,
}

impl Predicate {
    pub fn holds(self, left: i64, right: i64) -> bool {
        match self {
            Predicate::Greater => left > right,
            Predicate::Less => left < right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Resolved(bool),
    Stale,
}

impl GateOutcome {
    pub fn resolved(self) -> Option<bool> {
        match self {
            GateOutcome::Resolved(outcome) => Some(outcome),
            GateOutcome::Stale => None,
        }
    }
}

impl RunContext {
    pub async fn compare(
        &mut self,
        left: Position,
        right: Position,
        predicate: Predicate,
    ) -> Result<GateOutcome, EngineError> {
        {
            let Some(mut store) = self.lock_live().await else {
                return Ok(GateOutcome::Stale);
            };
            store.check(left)?;
            store.check(right)?;
            store.highlight(left, Highlight::Comparing)?;
            store.highlight(right, Highlight::Comparing)?;
        }

        let duration = self.timing().compare;
        if self.suspend(duration).await == Liveness::Stale {
            return Ok(GateOutcome::Stale);
        }

        let outcome = {
            let Some(mut store) = self.lock_live().await else {
                return Ok(GateOutcome::Stale);
            };
            store.clear_highlight(left)?;
            store.clear_highlight(right)?;
            predicate.holds(store.value(left)?, store.value(right)?)
        };

        self.metrics.record_comparison(self.token).await;
        trace!(
            token = %self.token,
            left = left.0,
            right = right.0,
            ?predicate,
            outcome,
            "comparison resolved"
        );
        Ok(GateOutcome::Resolved(outcome))
    }
}

#[cfg(test)]
#[path = "tests/gate_tests.rs"]
mod tests;
