use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use shared::{
    domain::{Algorithm, Position},
    error::EngineError,
    protocol::Movement,
};

use super::{Flow, SortDriver};
use crate::{context::RunContext, gate::Predicate, transition::Finalize};

/// The top-level merge of a run. Only this merge settles positions, and it
/// is followed by a settle sweep over the whole sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeCheckpoint {
    pub low: usize,
    pub mid: usize,
    pub high: usize,
}

impl MergeCheckpoint {
    pub fn for_len(len: usize) -> Option<Self> {
        (len >= 2).then(|| Self {
            low: 0,
            mid: (len - 1) / 2,
            high: len - 1,
        })
    }

    pub fn matches(&self, low: usize, mid: usize, high: usize) -> bool {
        self.low == low && self.mid == mid && self.high == high
    }
}

pub struct MergeSort;

#[async_trait]
impl SortDriver for MergeSort {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Merge
    }

    async fn run(&self, ctx: &mut RunContext) -> Result<Flow, EngineError> {
        let len = ctx.len().await;
        match MergeCheckpoint::for_len(len) {
            Some(checkpoint) => sort_range(ctx, checkpoint, 0, len - 1).await,
            None => {
                proceed!(ctx.settle((0..len).map(Position)).await);
                Ok(Flow::Completed)
            }
        }
    }
}

fn sort_range(
    ctx: &mut RunContext,
    checkpoint: MergeCheckpoint,
    low: usize,
    high: usize,
) -> BoxFuture<'_, Result<Flow, EngineError>> {
    async move {
        if !ctx.is_live() {
            return Ok(Flow::Cancelled);
        }
        if low >= high {
            return Ok(Flow::Completed);
        }
        let mid = low + (high - low) / 2;
        descend!(sort_range(ctx, checkpoint, low, mid).await);
        descend!(sort_range(ctx, checkpoint, mid + 1, high).await);
        merge(ctx, checkpoint, low, mid, high).await
    }
    .boxed()
}

async fn merge(
    ctx: &mut RunContext,
    checkpoint: MergeCheckpoint,
    low: usize,
    mid: usize,
    high: usize,
) -> Result<Flow, EngineError> {
    let is_final = checkpoint.matches(low, mid, high);

    for i in mid + 1..=high {
        for j in low..i {
            if !resolve!(ctx.compare(Position(i), Position(j), Predicate::Less).await) {
                continue;
            }
            let finalize = if is_final {
                Finalize::settle((0..=j).map(Position))
            } else {
                Finalize::Neutral
            };
            proceed!(ctx.animate(Movement::shift(Position(i), Position(j)), finalize).await);
            break;
        }
    }

    if is_final {
        proceed!(ctx.settle_sweep().await);
    }
    Ok(Flow::Completed)
}
