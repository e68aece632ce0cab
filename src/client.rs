//! High-level client handle.
//!
//! [`DfsClient`] wires the components together the way an embedding UI
//! consumes them: one controller client shared by the catalog store, the
//! health monitor and the upload orchestrator, all reconciled by a single
//! poll scheduler.

use std::sync::Arc;

use bytes::Bytes;

use crate::api::{Controller, ControllerClient};
use crate::catalog::CatalogStore;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::health::{HealthMonitor, ReachabilityStatus};
use crate::sync::SyncScheduler;
use crate::upload::{UploadOrchestrator, UploadTask};

/// Handle to a storage controller, with polling started.
pub struct DfsClient {
    api: Arc<ControllerClient>,
    catalog: Arc<CatalogStore>,
    health: Arc<HealthMonitor>,
    uploader: UploadOrchestrator,
    scheduler: SyncScheduler,
}

impl DfsClient {
    /// Build a client for the configured controller and start the poll
    /// scheduler.
    ///
    /// Must be called within a tokio runtime.
    pub fn connect(config: ClientConfig) -> Self {
        let api = Arc::new(ControllerClient::new(&config));
        let controller: Arc<dyn Controller> = Arc::clone(&api) as Arc<dyn Controller>;
        let catalog = Arc::new(CatalogStore::new(Arc::clone(&controller)));
        let health = Arc::new(HealthMonitor::new(Arc::clone(&controller)));
        let uploader = UploadOrchestrator::new(Arc::clone(&controller), Arc::clone(&catalog));
        let scheduler = SyncScheduler::new(
            controller,
            Arc::clone(&catalog),
            Arc::clone(&health),
            config.poll_interval,
        );
        scheduler.start();

        Self {
            api,
            catalog,
            health,
            uploader,
            scheduler,
        }
    }

    /// File names known to the client, server order first.
    pub fn files(&self) -> Vec<String> {
        self.catalog.list()
    }

    /// Whether the displayed list is stale after a failed refresh.
    pub fn is_stale(&self) -> bool {
        self.catalog.is_stale()
    }

    /// Force a catalog refresh outside the scheduled ticks.
    pub async fn refresh(&self) -> Result<()> {
        self.catalog.refresh().await
    }

    /// Current reachability status.
    pub fn status(&self) -> ReachabilityStatus {
        self.health.status()
    }

    /// Stage a file for upload.
    pub fn select_file(&self, name: impl Into<String>, payload: impl Into<Bytes>) {
        self.uploader.select(name, payload);
    }

    /// Upload the staged file; see [`UploadOrchestrator::start`].
    pub async fn upload(&self) -> Result<String> {
        self.uploader.start().await
    }

    /// Snapshot of the upload task.
    pub fn upload_task(&self) -> UploadTask {
        self.uploader.task()
    }

    /// Consume a terminal upload outcome, returning the slot to idle.
    pub fn acknowledge_upload(&self) -> Option<UploadTask> {
        self.uploader.acknowledge()
    }

    /// Delete a file, optimistically; see [`CatalogStore::remove`].
    pub async fn remove(&self, name: &str) -> Result<()> {
        self.catalog.remove(name).await
    }

    /// Direct download link for a file.
    pub fn download_url(&self, name: &str) -> String {
        self.api.download_url(name)
    }

    /// Access to the upload orchestrator, e.g. to register a progress hook.
    pub fn uploader(&self) -> &UploadOrchestrator {
        &self.uploader
    }

    /// Stop the poll scheduler. Also happens on drop.
    pub fn shutdown(&self) {
        self.scheduler.shutdown();
    }
}
