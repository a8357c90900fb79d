use std::time::Duration;

use shared::{domain::ElementState, speed::Timing};

use super::*;
use crate::test_support::Harness;

#[tokio::test(start_paused = true)]
async fn compare_evaluates_predicate_and_counts() {
    let harness = Harness::new(vec![5, 3], Timing::default()).await;
    let mut ctx = harness.context();

    let outcome = ctx
        .compare(Position(0), Position(1), Predicate::Greater)
        .await
        .expect("compare");
    assert_eq!(outcome, GateOutcome::Resolved(true));

    let outcome = ctx
        .compare(Position(0), Position(1), Predicate::Less)
        .await
        .expect("compare");
    assert_eq!(outcome, GateOutcome::Resolved(false));

    assert_eq!(harness.metrics.snapshot().await.comparisons, 2);
    assert_eq!(harness.states().await, vec![ElementState::Neutral; 2]);
}

#[tokio::test(start_paused = true)]
async fn positions_stay_highlighted_while_suspended() {
    let harness = Harness::new(vec![1, 2, 3], Timing::default()).await;
    let mut ctx = harness.context();
    let task = tokio::spawn(async move {
        ctx.compare(Position(0), Position(2), Predicate::Less).await
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(
        harness.states().await,
        vec![
            ElementState::Comparing,
            ElementState::Neutral,
            ElementState::Comparing
        ]
    );

    let outcome = task.await.expect("join").expect("compare");
    assert_eq!(outcome, GateOutcome::Resolved(true));
}

#[tokio::test(start_paused = true)]
async fn settled_positions_return_to_settled_after_compare() {
    let harness = Harness::new(vec![1, 2], Timing::default()).await;
    harness
        .store
        .lock()
        .await
        .settle(Position(0))
        .expect("settle");
    let mut ctx = harness.context();

    ctx.compare(Position(0), Position(1), Predicate::Greater)
        .await
        .expect("compare");
    assert_eq!(
        harness.states().await,
        vec![ElementState::Settled, ElementState::Neutral]
    );
}

#[tokio::test(start_paused = true)]
async fn invalidation_during_suspension_yields_stale() {
    let harness = Harness::new(vec![5, 3], Timing::default()).await;
    let mut ctx = harness.context();
    let task = tokio::spawn(async move {
        ctx.compare(Position(0), Position(1), Predicate::Greater).await
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    harness.invalidate().await;

    let outcome = task.await.expect("join").expect("compare");
    assert_eq!(outcome, GateOutcome::Stale);
    assert_eq!(harness.metrics.snapshot().await.comparisons, 0);
}

#[tokio::test(start_paused = true)]
async fn stale_entry_does_not_touch_the_store() {
    let harness = Harness::new(vec![5, 3], Timing::default()).await;
    harness.invalidate().await;
    let mut ctx = harness.context();

    let outcome = ctx
        .compare(Position(0), Position(1), Predicate::Greater)
        .await
        .expect("compare");
    assert_eq!(outcome, GateOutcome::Stale);
    assert_eq!(harness.states().await, vec![ElementState::Neutral; 2]);
}

#[tokio::test(start_paused = true)]
async fn out_of_bounds_compare_is_an_error() {
    let harness = Harness::new(vec![5, 3], Timing::default()).await;
    let mut ctx = harness.context();

    let err = ctx
        .compare(Position(0), Position(2), Predicate::Greater)
        .await
        .expect_err("position 2 is out of bounds");
    assert!(matches!(
        err,
        EngineError::PositionOutOfBounds { position: 2, len: 2 }
    ));
}
