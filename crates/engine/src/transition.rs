//! Swap and block-shift animations, committed in two phases.
//!
//! A transition is begun, its values are committed once the keyframe
//! animation has run (the commit point), and the driver may only continue at
//! the completion point: a swap adds the settle gap, a block shift completes
//! on commit. Drivers read the store right after `animate` returns, so the
//! commit must have landed by then.

use shared::{
    domain::{Highlight, Position},
    error::EngineError,
    protocol::{Movement, ViewEvent},
};
use tokio::time::Instant;
use tracing::debug;

use crate::context::{Liveness, RunContext};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Finalize {
    #[default]
    Neutral,
    Settle(Vec<Position>),
}

impl Finalize {
    pub fn settle<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        Finalize::Settle(positions.into_iter().collect())
    }
}

#[derive(Debug)]
#[must_use = "a transition does nothing until it is committed"]
pub struct Transition {
    movement: Movement,
    commit_at: Instant,
    complete_at: Instant,
}

impl Transition {
    pub async fn commit(
        &self,
        ctx: &mut RunContext,
        finalize: &Finalize,
    ) -> Result<Liveness, EngineError> {
        if ctx.suspend_until(self.commit_at).await.is_stale() {
            return Ok(Liveness::Stale);
        }

        {
            let Some(mut store) = ctx.lock_live().await else {
                return Ok(Liveness::Stale);
            };
            let values = store.apply(&self.movement)?;
            for position in highlighted(&self.movement) {
                store.clear_highlight(position)?;
            }
            if let Finalize::Settle(positions) = finalize {
                for position in positions {
                    store.settle(*position)?;
                }
            }
            let _ = ctx.events.send(ViewEvent::ValuesCommitted {
                token: ctx.token,
                movement: self.movement,
                values,
            });
        }

        ctx.metrics.record_swap(ctx.token).await;
        Ok(Liveness::Live)
    }

    pub async fn finish(self, ctx: &mut RunContext) -> Liveness {
        if ctx.suspend_until(self.complete_at).await.is_stale() {
            return Liveness::Stale;
        }
        let _ = ctx.events.send(ViewEvent::TransitionFinished {
            token: ctx.token,
            movement: self.movement,
        });
        Liveness::Live
    }
}

fn highlighted(movement: &Movement) -> Vec<Position> {
    match *movement {
        Movement::Swap { a, b } => vec![a, b],
        Movement::Shift { from, .. } => vec![from],
    }
}

impl RunContext {
    pub async fn begin_transition(
        &mut self,
        movement: Movement,
    ) -> Result<Option<Transition>, EngineError> {
        let timing = self.timing();
        let Some(mut store) = self.lock_live().await else {
            return Ok(None);
        };
        for position in movement.span() {
            store.check(position)?;
        }
        let highlight = match movement {
            Movement::Swap { .. } => Highlight::Swapping,
            Movement::Shift { .. } => Highlight::Moving,
        };
        for position in highlighted(&movement) {
            store.highlight(position, highlight)?;
        }

        let commit_at = Instant::now() + timing.animation;
        // Merge resumes as soon as a block shift lands.
        let complete_at = match movement {
            Movement::Swap { .. } => commit_at + timing.settle_gap,
            Movement::Shift { .. } => commit_at,
        };
        let _ = self.events.send(ViewEvent::TransitionStarted {
            token: self.token,
            movement,
            duration_ms: u64::try_from(timing.animation.as_millis()).unwrap_or(u64::MAX),
        });
        debug!(token = %self.token, ?movement, "transition started");

        Ok(Some(Transition {
            movement,
            commit_at,
            complete_at,
        }))
    }

    pub async fn animate(
        &mut self,
        movement: Movement,
        finalize: Finalize,
    ) -> Result<Liveness, EngineError> {
        let Some(transition) = self.begin_transition(movement).await? else {
            return Ok(Liveness::Stale);
        };
        if transition.commit(self, &finalize).await?.is_stale() {
            return Ok(Liveness::Stale);
        }
        Ok(transition.finish(self).await)
    }
}

#[cfg(test)]
#[path = "tests/transition_tests.rs"]
mod tests;
