use std::time::Duration;

use chrono::{DateTime, Utc};
use shared::{
    domain::RunToken,
    protocol::{MetricsSnapshot, ViewEvent},
};
use tokio::{
    sync::{broadcast, Mutex},
    time::Instant,
};

#[derive(Default)]
struct MetricsState {
    token: Option<RunToken>,
    comparisons: u64,
    swaps: u64,
    started: Option<Instant>,
    started_at: Option<DateTime<Utc>>,
    elapsed: Option<Duration>,
}

impl MetricsState {
    fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            comparisons: self.comparisons,
            swaps: self.swaps,
            started_at: self.started_at,
            elapsed_ms: self
                .elapsed
                .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)),
        }
    }

    fn owns(&self, token: RunToken) -> bool {
        self.token == Some(token)
    }
}

pub struct MetricsSink {
    inner: Mutex<MetricsState>,
    events: broadcast::Sender<ViewEvent>,
}

impl MetricsSink {
    pub fn new(events: broadcast::Sender<ViewEvent>) -> Self {
        Self {
            inner: Mutex::new(MetricsState::default()),
            events,
        }
    }

    pub async fn begin(&self, token: RunToken) {
        let mut guard = self.inner.lock().await;
        *guard = MetricsState {
            token: Some(token),
            started: Some(Instant::now()),
            started_at: Some(Utc::now()),
            ..MetricsState::default()
        };
        self.publish(&guard);
    }

    pub async fn record_comparison(&self, token: RunToken) -> bool {
        let mut guard = self.inner.lock().await;
        if !guard.owns(token) || guard.elapsed.is_some() {
            return false;
        }
        guard.comparisons += 1;
        self.publish(&guard);
        true
    }

    pub async fn record_swap(&self, token: RunToken) -> bool {
        let mut guard = self.inner.lock().await;
        if !guard.owns(token) || guard.elapsed.is_some() {
            return false;
        }
        guard.swaps += 1;
        self.publish(&guard);
        true
    }

    /// Stops the clock. A second call returns the elapsed time captured by
    /// the first one; a foreign token gets `None`.
    pub async fn finalize(&self, token: RunToken) -> Option<Duration> {
        let mut guard = self.inner.lock().await;
        if !guard.owns(token) {
            return None;
        }
        if let Some(elapsed) = guard.elapsed {
            return Some(elapsed);
        }
        let elapsed = guard.started.map(|started| started.elapsed())?;
        guard.elapsed = Some(elapsed);
        self.publish(&guard);
        Some(elapsed)
    }

    pub async fn reset(&self) {
        let mut guard = self.inner.lock().await;
        *guard = MetricsState::default();
        self.publish(&guard);
    }

    pub async fn snapshot(&self) -> MetricsSnapshot {
        self.inner.lock().await.snapshot()
    }

    fn publish(&self, state: &MetricsState) {
        let _ = self.events.send(ViewEvent::MetricsUpdated(state.snapshot()));
    }
}

#[cfg(test)]
#[path = "tests/metrics_tests.rs"]
mod tests;
