pub mod context;
pub mod controller;
pub mod drivers;
pub mod gate;
pub mod metrics;
pub mod reference;
pub mod sequence;
pub mod transition;

pub use context::{Liveness, RunContext};
pub use controller::RunController;
pub use drivers::{driver_for, Flow, SortDriver};
pub use gate::{GateOutcome, Predicate};
pub use metrics::MetricsSink;
pub use reference::{reference_sort, ReferenceRun};
pub use sequence::SequenceStore;
pub use transition::{Finalize, Transition};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
