use std::{sync::Arc, time::Duration};

use shared::{
    domain::{Algorithm, Position, RunStatus, RunToken},
    error::EngineError,
    protocol::ViewEvent,
    speed::Timing,
};
use tokio::{
    sync::{broadcast, watch, Mutex, MutexGuard},
    time::{sleep_until, Instant},
};

use crate::{metrics::MetricsSink, sequence::SequenceStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Live,
    Stale,
}

impl Liveness {
    pub fn is_stale(self) -> bool {
        self == Liveness::Stale
    }
}

pub struct RunContext {
    pub(crate) token: RunToken,
    pub(crate) algorithm: Algorithm,
    pub(crate) status: watch::Receiver<RunStatus>,
    pub(crate) timing: watch::Receiver<Timing>,
    pub(crate) store: Arc<Mutex<SequenceStore>>,
    pub(crate) metrics: Arc<MetricsSink>,
    pub(crate) events: broadcast::Sender<ViewEvent>,
}

impl RunContext {
    pub(crate) fn new(
        token: RunToken,
        algorithm: Algorithm,
        status: watch::Receiver<RunStatus>,
        timing: watch::Receiver<Timing>,
        store: Arc<Mutex<SequenceStore>>,
        metrics: Arc<MetricsSink>,
        events: broadcast::Sender<ViewEvent>,
    ) -> Self {
        Self {
            token,
            algorithm,
            status,
            timing,
            store,
            metrics,
            events,
        }
    }

    pub fn token(&self) -> RunToken {
        self.token
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn is_live(&self) -> bool {
        self.status.borrow().admits(self.token, self.algorithm)
    }

    pub(crate) fn timing(&self) -> Timing {
        *self.timing.borrow()
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn values(&self) -> Vec<i64> {
        self.store.lock().await.values()
    }

    /// Locks the store only if the run is still live. The controller flips
    /// run status while holding the same lock, so a guard returned here can
    /// never outlive the run it was taken for.
    pub(crate) async fn lock_live(&self) -> Option<MutexGuard<'_, SequenceStore>> {
        let store = self.store.lock().await;
        self.is_live().then_some(store)
    }

    pub(crate) async fn suspend(&mut self, duration: Duration) -> Liveness {
        self.suspend_until(Instant::now() + duration).await
    }

    pub(crate) async fn suspend_until(&mut self, deadline: Instant) -> Liveness {
        loop {
            if !self.is_live() {
                return Liveness::Stale;
            }
            tokio::select! {
                _ = sleep_until(deadline) => break,
                changed = self.status.changed() => {
                    if changed.is_err() {
                        return Liveness::Stale;
                    }
                }
            }
        }

        if self.is_live() {
            Liveness::Live
        } else {
            Liveness::Stale
        }
    }

    pub async fn settle<I>(&mut self, positions: I) -> Result<Liveness, EngineError>
    where
        I: IntoIterator<Item = Position>,
    {
        let positions: Vec<Position> = positions.into_iter().collect();
        let Some(mut store) = self.lock_live().await else {
            return Ok(Liveness::Stale);
        };
        for position in positions {
            store.settle(position)?;
        }
        Ok(Liveness::Live)
    }

    pub async fn settle_sweep(&mut self) -> Result<Liveness, EngineError> {
        let len = self.len().await;
        for index in 0..len {
            if self.settle([Position(index)]).await?.is_stale() {
                return Ok(Liveness::Stale);
            }
            let interval = self.timing().sweep_interval;
            if self.suspend(interval).await.is_stale() {
                return Ok(Liveness::Stale);
            }
        }
        Ok(Liveness::Live)
    }
}
