use std::sync::Arc;

use shared::{
    domain::{Algorithm, ElementState, RunPhase, RunStatus, RunToken},
    protocol::ViewEvent,
    speed::Timing,
};
use tokio::sync::{broadcast, watch, Mutex};

use crate::{context::RunContext, metrics::MetricsSink, sequence::SequenceStore};

/// A live run without a controller: status, store and metrics wired the way
/// `RunController::start` wires them.
pub(crate) struct Harness {
    pub token: RunToken,
    pub algorithm: Algorithm,
    pub status: watch::Sender<RunStatus>,
    pub timing: watch::Sender<Timing>,
    pub store: Arc<Mutex<SequenceStore>>,
    pub metrics: Arc<MetricsSink>,
    pub events: broadcast::Sender<ViewEvent>,
}

impl Harness {
    pub async fn new(values: Vec<i64>, timing: Timing) -> Self {
        let (events, _) = broadcast::channel(1024);
        let mut store = SequenceStore::new(events.clone());
        store.load(values);

        let token = RunToken::mint();
        let algorithm = Algorithm::Bubble;
        let metrics = Arc::new(MetricsSink::new(events.clone()));
        metrics.begin(token).await;

        let (status, _) = watch::channel(RunStatus {
            phase: RunPhase::Running,
            algorithm,
            token: Some(token),
        });
        let (timing, _) = watch::channel(timing);

        Self {
            token,
            algorithm,
            status,
            timing,
            store: Arc::new(Mutex::new(store)),
            metrics,
            events,
        }
    }

    pub fn context(&self) -> RunContext {
        RunContext::new(
            self.token,
            self.algorithm,
            self.status.subscribe(),
            self.timing.subscribe(),
            Arc::clone(&self.store),
            Arc::clone(&self.metrics),
            self.events.clone(),
        )
    }

    /// Flips the run to `Resetting` under the store lock, like a reset does.
    pub async fn invalidate(&self) {
        let _store = self.store.lock().await;
        self.status
            .send_modify(|status| status.phase = RunPhase::Resetting);
    }

    pub async fn values(&self) -> Vec<i64> {
        self.store.lock().await.values()
    }

    pub async fn states(&self) -> Vec<ElementState> {
        self.store.lock().await.states()
    }
}

pub(crate) fn drain(events: &mut broadcast::Receiver<ViewEvent>) -> Vec<ViewEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

/// Values carried by every `ValuesCommitted` event, in order.
pub(crate) fn commits(events: &[ViewEvent]) -> Vec<Vec<i64>> {
    events
        .iter()
        .filter_map(|event| match event {
            ViewEvent::ValuesCommitted { values, .. } => Some(values.clone()),
            _ => None,
        })
        .collect()
}
