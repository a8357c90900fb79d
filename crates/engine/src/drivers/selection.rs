use async_trait::async_trait;
use shared::{
    domain::{Algorithm, Position},
    error::EngineError,
    protocol::Movement,
};

use super::{Flow, SortDriver};
use crate::{context::RunContext, gate::Predicate, transition::Finalize};

pub struct SelectionSort;

#[async_trait]
impl SortDriver for SelectionSort {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Selection
    }

    async fn run(&self, ctx: &mut RunContext) -> Result<Flow, EngineError> {
        let len = ctx.len().await;
        for i in 0..len {
            if !ctx.is_live() {
                return Ok(Flow::Cancelled);
            }

            let mut min = i;
            for candidate in i + 1..len {
                if resolve!(
                    ctx.compare(Position(candidate), Position(min), Predicate::Less)
                        .await
                ) {
                    min = candidate;
                }
            }

            let target = Position(i);
            if min == i {
                proceed!(ctx.settle([target]).await);
            } else {
                proceed!(
                    ctx.animate(
                        Movement::swap(target, Position(min)),
                        Finalize::settle([target])
                    )
                    .await
                );
            }
        }
        Ok(Flow::Completed)
    }
}
