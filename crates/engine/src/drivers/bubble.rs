use async_trait::async_trait;
use shared::{
    domain::{Algorithm, Position},
    error::EngineError,
    protocol::Movement,
};

use super::{Flow, SortDriver};
use crate::{context::RunContext, gate::Predicate, transition::Finalize};

pub struct BubbleSort;

#[async_trait]
impl SortDriver for BubbleSort {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Bubble
    }

    async fn run(&self, ctx: &mut RunContext) -> Result<Flow, EngineError> {
        let len = ctx.len().await;
        for end in (0..len).rev() {
            for j in 0..end {
                let (left, right) = (Position(j), Position(j + 1));
                if resolve!(ctx.compare(left, right, Predicate::Greater).await) {
                    proceed!(ctx.animate(Movement::swap(left, right), Finalize::Neutral).await);
                }
            }
            proceed!(ctx.settle([Position(end)]).await);
        }
        Ok(Flow::Completed)
    }
}
