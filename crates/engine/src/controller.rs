use std::sync::Arc;

use shared::{
    domain::{Algorithm, ElementState, RunPhase, RunStatus, RunToken},
    error::{EngineError, EngineErrorPayload},
    protocol::{ControlRequest, MetricsSnapshot, ViewEvent},
    speed::Timing,
};
use tokio::{
    sync::{broadcast, watch, Mutex},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

use crate::{
    context::RunContext,
    drivers::{driver_for, Flow, SortDriver},
    metrics::MetricsSink,
    sequence::SequenceStore,
};

const EVENT_CAPACITY: usize = 4096;

pub struct RunController {
    status: watch::Sender<RunStatus>,
    timing: watch::Sender<Timing>,
    store: Arc<Mutex<SequenceStore>>,
    metrics: Arc<MetricsSink>,
    events: broadcast::Sender<ViewEvent>,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl RunController {
    pub fn new(timing: Timing) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (status, _) = watch::channel(RunStatus::default());
        let (timing, _) = watch::channel(timing);
        Arc::new(Self {
            status,
            timing,
            store: Arc::new(Mutex::new(SequenceStore::new(events.clone()))),
            metrics: Arc::new(MetricsSink::new(events.clone())),
            events,
            driver: Mutex::new(None),
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    pub fn status(&self) -> RunStatus {
        *self.status.borrow()
    }

    pub fn timing(&self) -> Timing {
        *self.timing.borrow()
    }

    pub async fn values(&self) -> Vec<i64> {
        self.store.lock().await.values()
    }

    pub async fn states(&self) -> Vec<ElementState> {
        self.store.lock().await.states()
    }

    pub async fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot().await
    }

    pub async fn load(&self, values: Vec<i64>) -> Result<(), EngineError> {
        {
            let mut store = self.store.lock().await;
            let phase = self.status.borrow().phase;
            if phase != RunPhase::Idle {
                return Err(EngineError::Busy {
                    action: "load",
                    phase,
                });
            }
            store.load(values);
            debug!(len = store.len(), "sequence loaded");
        }
        self.metrics.reset().await;
        Ok(())
    }

    pub fn set_timing(&self, timing: Timing) {
        debug!(?timing, "timing updated");
        self.timing.send_replace(timing);
    }

    pub async fn start(self: &Arc<Self>, algorithm: Algorithm) -> Result<RunToken, EngineError> {
        self.start_driver(driver_for(algorithm)).await
    }

    pub(crate) async fn start_driver(
        self: &Arc<Self>,
        sorter: Box<dyn SortDriver>,
    ) -> Result<RunToken, EngineError> {
        let algorithm = sorter.algorithm();
        let mut driver = self.driver.lock().await;

        let token = {
            let mut store = self.store.lock().await;
            let phase = self.status.borrow().phase;
            if phase != RunPhase::Idle {
                return Err(EngineError::Busy {
                    action: "start",
                    phase,
                });
            }
            let token = RunToken::mint();
            store.restore();
            self.metrics.begin(token).await;
            self.status.send_replace(RunStatus {
                phase: RunPhase::Running,
                algorithm,
                token: Some(token),
            });
            token
        };

        info!(%token, %algorithm, "run started");
        let _ = self.events.send(ViewEvent::RunStarted { token, algorithm });
        self.publish_phase();

        let mut ctx = RunContext::new(
            token,
            algorithm,
            self.status.subscribe(),
            self.timing.subscribe(),
            Arc::clone(&self.store),
            Arc::clone(&self.metrics),
            self.events.clone(),
        );
        let controller = Arc::clone(self);
        *driver = Some(tokio::spawn(async move {
            let outcome = sorter.run(&mut ctx).await;
            controller.finish_run(token, algorithm, outcome).await;
        }));

        Ok(token)
    }

    /// Aborts the live run. A no-op unless a run is `Running`, so a second
    /// call made while the first is still tearing down does nothing.
    pub async fn reset(&self) -> Result<(), EngineError> {
        let Some((token, algorithm)) = self.begin_reset().await else {
            debug!("reset ignored, no live run");
            return Ok(());
        };

        tokio::time::sleep(self.timing().animation).await;

        let handle = self.driver.lock().await.take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                warn!(%token, error = %err, "driver task did not shut down cleanly");
            }
        }

        {
            let mut store = self.store.lock().await;
            store.restore();
            self.metrics.reset().await;
            self.status.send_modify(|status| {
                status.phase = RunPhase::Idle;
                status.token = None;
            });
        }

        info!(%token, %algorithm, "run cancelled");
        let _ = self.events.send(ViewEvent::RunCancelled { token, algorithm });
        self.publish_phase();
        Ok(())
    }

    pub async fn select_algorithm(&self, algorithm: Algorithm) -> Result<(), EngineError> {
        match self.status().phase {
            RunPhase::Running => self.reset().await?,
            RunPhase::Resetting => self.wait_for_idle().await?,
            RunPhase::Idle => {}
        }

        {
            let mut store = self.store.lock().await;
            let phase = self.status.borrow().phase;
            if phase != RunPhase::Idle {
                return Err(EngineError::Busy {
                    action: "select algorithm",
                    phase,
                });
            }
            store.restore();
            self.status.send_modify(|status| status.algorithm = algorithm);
        }
        self.metrics.reset().await;

        debug!(%algorithm, "algorithm selected");
        self.publish_phase();
        Ok(())
    }

    pub async fn dispatch(self: &Arc<Self>, request: ControlRequest) -> Result<(), EngineError> {
        match request {
            ControlRequest::Load { values } => self.load(values).await,
            ControlRequest::Start { algorithm } => self.start(algorithm).await.map(|_| ()),
            ControlRequest::Reset => self.reset().await,
            ControlRequest::SelectAlgorithm { algorithm } => self.select_algorithm(algorithm).await,
            ControlRequest::SetSpeed { slider } => {
                self.set_timing(Timing::from_slider(slider));
                Ok(())
            }
        }
    }

    pub async fn wait_for_idle(&self) -> Result<(), EngineError> {
        let mut status = self.status.subscribe();
        status
            .wait_for(|status| status.phase == RunPhase::Idle)
            .await
            .map(|_| ())
            .map_err(|err| EngineError::DriverTask(err.to_string()))
    }

    async fn begin_reset(&self) -> Option<(RunToken, Algorithm)> {
        let store = self.store.lock().await;
        let status = self.status();
        let token = match (status.phase, status.token) {
            (RunPhase::Running, Some(token)) => token,
            _ => return None,
        };
        self.status
            .send_modify(|status| status.phase = RunPhase::Resetting);
        drop(store);

        info!(%token, "reset requested");
        self.publish_phase();
        Some((token, status.algorithm))
    }

    async fn finish_run(&self, token: RunToken, algorithm: Algorithm, outcome: Result<Flow, EngineError>) {
        match outcome {
            Ok(Flow::Cancelled) => debug!(%token, "driver dropped out after invalidation"),
            Ok(Flow::Completed) => {
                let metrics = {
                    let _store = self.store.lock().await;
                    if !self.status.borrow().admits(token, algorithm) {
                        debug!(%token, "completion ignored, run already invalidated");
                        return;
                    }
                    self.metrics.finalize(token).await;
                    let metrics = self.metrics.snapshot().await;
                    self.status.send_modify(|status| {
                        status.phase = RunPhase::Idle;
                        status.token = None;
                    });
                    metrics
                };

                info!(
                    %token,
                    %algorithm,
                    comparisons = metrics.comparisons,
                    swaps = metrics.swaps,
                    elapsed_ms = metrics.elapsed_ms,
                    "run finished"
                );
                let _ = self.events.send(ViewEvent::RunFinished {
                    token,
                    algorithm,
                    metrics,
                });
                self.publish_phase();
            }
            Err(err) => {
                {
                    let mut store = self.store.lock().await;
                    if !self.status.borrow().admits(token, algorithm) {
                        warn!(%token, error = %err, "driver failed after its run was invalidated");
                        return;
                    }
                    error!(%token, %algorithm, error = %err, "driver failed");
                    store.restore();
                    self.metrics.reset().await;
                    self.status.send_modify(|status| {
                        status.phase = RunPhase::Idle;
                        status.token = None;
                    });
                }

                let _ = self.events.send(ViewEvent::Error(EngineErrorPayload::from(&err)));
                self.publish_phase();
            }
        }
    }

    fn publish_phase(&self) {
        let status = self.status();
        let _ = self.events.send(ViewEvent::PhaseChanged {
            phase: status.phase,
            algorithm: status.algorithm,
        });
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
