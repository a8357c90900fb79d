use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use shared::{
    domain::{Algorithm, Position},
    error::EngineError,
    protocol::Movement,
};

use super::{Flow, SortDriver};
use crate::{context::RunContext, gate::Predicate, transition::Finalize};

pub struct QuickSort;

#[async_trait]
impl SortDriver for QuickSort {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Quick
    }

    async fn run(&self, ctx: &mut RunContext) -> Result<Flow, EngineError> {
        let len = ctx.len().await;
        sort_range(ctx, 0, len).await
    }
}

fn sort_range(
    ctx: &mut RunContext,
    low: usize,
    end: usize,
) -> BoxFuture<'_, Result<Flow, EngineError>> {
    async move {
        if !ctx.is_live() {
            return Ok(Flow::Cancelled);
        }
        match end.saturating_sub(low) {
            0 => Ok(Flow::Completed),
            1 => {
                proceed!(ctx.settle([Position(low)]).await);
                Ok(Flow::Completed)
            }
            _ => {
                let Some(pivot) = partition(ctx, low, end - 1).await? else {
                    return Ok(Flow::Cancelled);
                };
                descend!(sort_range(ctx, low, pivot).await);
                sort_range(ctx, pivot + 1, end).await
            }
        }
    }
    .boxed()
}

async fn partition(
    ctx: &mut RunContext,
    low: usize,
    high: usize,
) -> Result<Option<usize>, EngineError> {
    let pivot = Position(high);
    let mut store = low;

    for k in low..high {
        let outcome = match ctx.compare(Position(k), pivot, Predicate::Less).await?.resolved() {
            Some(outcome) => outcome,
            None => return Ok(None),
        };
        if !outcome {
            continue;
        }
        if store != k {
            let movement = Movement::swap(Position(store), Position(k));
            if ctx.animate(movement, Finalize::Neutral).await?.is_stale() {
                return Ok(None);
            }
        }
        store += 1;
    }

    let target = Position(store);
    let liveness = if store == high {
        ctx.settle([target]).await?
    } else {
        ctx.animate(Movement::swap(target, pivot), Finalize::settle([target]))
            .await?
    };
    Ok((!liveness.is_stale()).then_some(store))
}
