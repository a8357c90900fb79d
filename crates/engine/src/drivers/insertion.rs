use async_trait::async_trait;
use shared::{
    domain::{Algorithm, Position},
    error::EngineError,
    protocol::Movement,
};

use super::{Flow, SortDriver};
use crate::{context::RunContext, gate::Predicate, transition::Finalize};

pub struct InsertionSort;

#[async_trait]
impl SortDriver for InsertionSort {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Insertion
    }

    async fn run(&self, ctx: &mut RunContext) -> Result<Flow, EngineError> {
        let len = ctx.len().await;
        for i in 0..len {
            let mut j = i;
            while j > 0 {
                let (left, right) = (Position(j - 1), Position(j));
                if !resolve!(ctx.compare(left, right, Predicate::Greater).await) {
                    break;
                }
                proceed!(ctx.animate(Movement::swap(left, right), Finalize::Neutral).await);
                j -= 1;
            }
            proceed!(ctx.settle((0..=i).map(Position)).await);
        }
        Ok(Flow::Completed)
    }
}
