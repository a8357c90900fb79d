//! Property tests for completed, uninterrupted runs.
//!
//! 1. The final sequence is sorted ascending.
//! 2. It is a permutation of the input.
//! 3. Comparison and swap counts equal the reference implementation's.
//! 4. Every position ends Settled.

use engine::{reference_sort, RunController};
use proptest::prelude::*;
use shared::{
    domain::{Algorithm, ElementState},
    protocol::MetricsSnapshot,
    speed::Timing,
};

struct Outcome {
    values: Vec<i64>,
    states: Vec<ElementState>,
    metrics: MetricsSnapshot,
}

fn run_paused(algorithm: Algorithm, input: Vec<i64>) -> Outcome {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("build runtime");

    runtime.block_on(async move {
        let controller = RunController::new(Timing::instant());
        controller.load(input).await.expect("load");
        controller.start(algorithm).await.expect("start");
        controller.wait_for_idle().await.expect("run completes");
        Outcome {
            values: controller.values().await,
            states: controller.states().await,
            metrics: controller.metrics().await,
        }
    })
}

fn algorithms() -> impl Strategy<Value = Algorithm> {
    prop::sample::select(Algorithm::ALL.to_vec())
}

fn inputs() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-50i64..=50, 0..=12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn completed_runs_sort_and_count_like_reference(
        algorithm in algorithms(),
        input in inputs(),
    ) {
        let outcome = run_paused(algorithm, input.clone());

        prop_assert!(
            outcome.values.windows(2).all(|pair| pair[0] <= pair[1]),
            "{} left {:?} unsorted", algorithm, outcome.values
        );

        let mut expected = input.clone();
        expected.sort_unstable();
        prop_assert_eq!(&outcome.values, &expected);

        let reference = reference_sort(algorithm, &input);
        prop_assert_eq!(outcome.metrics.comparisons, reference.comparisons);
        prop_assert_eq!(outcome.metrics.swaps, reference.swaps);
        prop_assert!(outcome.metrics.elapsed_ms.is_some());

        prop_assert!(outcome.states.iter().all(|state| *state == ElementState::Settled));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn reference_sorts_agree_with_std(algorithm in algorithms(), input in prop::collection::vec(any::<i64>(), 0..=64)) {
        let mut expected = input.clone();
        expected.sort_unstable();
        prop_assert_eq!(reference_sort(algorithm, &input).sorted, expected);
    }
}
