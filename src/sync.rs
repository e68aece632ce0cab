//! Unified poll scheduler.
//!
//! One timer drives both reconciliation paths: each tick issues the files
//! and nodes reads once, concurrently, and fans the results out to the
//! catalog and the health monitor. This replaces a pair of uncoordinated
//! per-component timers that would hit `/files` twice per interval.
//!
//! The poll task is tied to the scheduler's lifetime: teardown aborts it,
//! dropping any in-flight request future so a late response can never
//! mutate state after the owning surface is gone.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::api::Controller;
use crate::catalog::CatalogStore;
use crate::health::HealthMonitor;

/// Timer-driven reconciliation of catalog and health state.
pub struct SyncScheduler {
    controller: Arc<dyn Controller>,
    catalog: Arc<CatalogStore>,
    health: Arc<HealthMonitor>,
    period: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SyncScheduler {
    /// Create a scheduler; call [`start`](Self::start) to begin polling.
    pub fn new(
        controller: Arc<dyn Controller>,
        catalog: Arc<CatalogStore>,
        health: Arc<HealthMonitor>,
        period: Duration,
    ) -> Self {
        Self {
            controller,
            catalog,
            health,
            period,
            task: Mutex::new(None),
        }
    }

    /// Run a single tick immediately, outside the timer.
    pub async fn poll_once(&self) {
        run_tick(&self.controller, &self.catalog, &self.health).await;
    }

    /// Spawn the poll task. The first tick fires immediately, then one per
    /// period. A previously running task is replaced.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(&self) {
        let controller = Arc::clone(&self.controller);
        let catalog = Arc::clone(&self.catalog);
        let health = Arc::clone(&self.health);
        let period = self.period;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                run_tick(&controller, &catalog, &health).await;
            }
        });

        if let Some(previous) = self.task.lock().unwrap().replace(handle) {
            previous.abort();
        }
    }

    /// Whether the poll task is currently running.
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap()
            .as_ref()
            .map(|t| !t.is_finished())
            .unwrap_or(false)
    }

    /// Stop polling. Any in-flight tick is aborted and its response
    /// discarded.
    pub fn shutdown(&self) {
        if let Some(handle) = self.task.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_tick(
    controller: &Arc<dyn Controller>,
    catalog: &CatalogStore,
    health: &HealthMonitor,
) {
    debug!("poll tick");
    let (files, nodes) = tokio::join!(controller.list_files(), controller.list_nodes());

    match &files {
        Ok(list) => catalog.apply_authoritative(list.clone()),
        Err(_) => catalog.mark_stale(),
    }
    health.apply(files.map(|f| f.len()), nodes.map(|n| n.len()));
}
