use async_trait::async_trait;
use shared::{domain::Algorithm, error::EngineError};

use crate::context::RunContext;

macro_rules! resolve {
    ($outcome:expr) => {
        match $outcome?.resolved() {
            Some(outcome) => outcome,
            None => return Ok($crate::drivers::Flow::Cancelled),
        }
    };
}

macro_rules! proceed {
    ($liveness:expr) => {
        if $liveness?.is_stale() {
            return Ok($crate::drivers::Flow::Cancelled);
        }
    };
}

macro_rules! descend {
    ($flow:expr) => {
        if $flow? == $crate::drivers::Flow::Cancelled {
            return Ok($crate::drivers::Flow::Cancelled);
        }
    };
}

mod bubble;
mod insertion;
mod merge;
mod quick;
mod selection;

pub use bubble::BubbleSort;
pub use insertion::InsertionSort;
pub use merge::{MergeCheckpoint, MergeSort};
pub use quick::QuickSort;
pub use selection::SelectionSort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Completed,
    Cancelled,
}

#[async_trait]
pub trait SortDriver: Send + Sync {
    fn algorithm(&self) -> Algorithm;

    async fn run(&self, ctx: &mut RunContext) -> Result<Flow, EngineError>;
}

pub fn driver_for(algorithm: Algorithm) -> Box<dyn SortDriver> {
    match algorithm {
        Algorithm::Bubble => Box::new(BubbleSort),
        Algorithm::Selection => Box::new(SelectionSort),
        Algorithm::Insertion => Box::new(InsertionSort),
        Algorithm::Quick => Box::new(QuickSort),
        Algorithm::Merge => Box::new(MergeSort),
    }
}
