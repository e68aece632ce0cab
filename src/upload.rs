//! Upload orchestration: one tracked transfer at a time.
//!
//! The orchestrator owns a single upload slot. A file is selected, then
//! `start` drives the multipart POST while mapping byte progress to an
//! integer percentage, surfaced immediately on every chunk. Success appends
//! the name to the catalog optimistically, so it is visible before the next
//! poll confirms it.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tracing::{info, warn};

use crate::api::{ByteProgress, Controller};
use crate::catalog::CatalogStore;
use crate::error::{ClientError, Result};
use crate::progress::{ProgressCallback, TransferProgress};

/// Generic status text shown for any failed upload; the real cause is
/// logged by the transport layer.
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed";

/// Status text shown while a transfer is in flight.
const UPLOADING_MESSAGE: &str = "Uploading...";

/// Lifecycle of the single upload slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    /// No transfer in flight or awaiting display.
    Idle,
    /// Transfer in flight.
    Uploading,
    /// Terminal: transfer completed, awaiting [`UploadOrchestrator::acknowledge`].
    Succeeded,
    /// Terminal: transfer failed, awaiting [`UploadOrchestrator::acknowledge`].
    Failed,
}

/// Snapshot of the current upload task.
#[derive(Debug, Clone)]
pub struct UploadTask {
    /// Name of the file being (or last) transferred.
    pub file_name: Option<String>,
    /// Integer percentage, 0-100, monotonically non-decreasing within one
    /// upload and reset to 0 only when the next upload starts.
    pub progress: u8,
    /// Current lifecycle state.
    pub state: UploadState,
    /// Status text for the embedding UI.
    pub message: String,
}

impl Default for UploadTask {
    fn default() -> Self {
        Self {
            file_name: None,
            progress: 0,
            state: UploadState::Idle,
            message: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct FileSelection {
    name: String,
    payload: Bytes,
}

#[derive(Default)]
struct Inner {
    selection: Option<FileSelection>,
    task: UploadTask,
}

/// Drives a single file transfer and tracks it to completion.
pub struct UploadOrchestrator {
    controller: Arc<dyn Controller>,
    catalog: Arc<CatalogStore>,
    inner: Arc<Mutex<Inner>>,
    progress_hook: Arc<Mutex<Option<ProgressCallback>>>,
}

impl UploadOrchestrator {
    /// Create an orchestrator that appends successful uploads to `catalog`.
    pub fn new(controller: Arc<dyn Controller>, catalog: Arc<CatalogStore>) -> Self {
        Self {
            controller,
            catalog,
            inner: Arc::new(Mutex::new(Inner::default())),
            progress_hook: Arc::new(Mutex::new(None)),
        }
    }

    /// Stage a file for the next [`start`](Self::start) call.
    ///
    /// Selecting during an in-flight upload only affects the next start.
    pub fn select(&self, name: impl Into<String>, payload: impl Into<Bytes>) {
        let mut inner = self.inner.lock().unwrap();
        inner.selection = Some(FileSelection {
            name: name.into(),
            payload: payload.into(),
        });
    }

    /// Drop the staged file, if any.
    pub fn clear_selection(&self) {
        self.inner.lock().unwrap().selection = None;
    }

    /// Name of the currently staged file.
    pub fn selected_file(&self) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .selection
            .as_ref()
            .map(|s| s.name.clone())
    }

    /// Snapshot of the current task.
    pub fn task(&self) -> UploadTask {
        self.inner.lock().unwrap().task.clone()
    }

    /// Register a callback invoked on every progress update.
    pub fn set_progress_hook(&self, hook: ProgressCallback) {
        *self.progress_hook.lock().unwrap() = Some(hook);
    }

    /// Upload the staged file to the controller.
    ///
    /// Exactly one upload may be in flight: a second start attempt fails
    /// with [`ClientError::UploadInFlight`] rather than being queued. With
    /// no staged file it fails with [`ClientError::NoFileSelected`] before
    /// any state transition.
    ///
    /// On success the file name is appended to the catalog optimistically
    /// and the selection is cleared; on failure the catalog is untouched
    /// and the selection kept for another attempt.
    pub async fn start(&self) -> Result<String> {
        let (name, payload) = {
            let mut inner = self.inner.lock().unwrap();
            if inner.task.state == UploadState::Uploading {
                return Err(ClientError::UploadInFlight);
            }
            let selection = inner
                .selection
                .as_ref()
                .ok_or(ClientError::NoFileSelected)?;
            let name = selection.name.clone();
            let payload = selection.payload.clone();

            inner.task = UploadTask {
                file_name: Some(name.clone()),
                progress: 0,
                state: UploadState::Uploading,
                message: UPLOADING_MESSAGE.to_string(),
            };
            (name, payload)
        };

        let sink = Arc::clone(&self.inner);
        let hook = Arc::clone(&self.progress_hook);
        let observer: ByteProgress = Box::new(move |done, total| {
            let progress = TransferProgress::new(done, total);
            let percent = progress.percent();
            {
                let mut inner = sink.lock().unwrap();
                // Monotonic within one upload; a late or reordered chunk
                // report never moves the bar backwards.
                if percent > inner.task.progress {
                    inner.task.progress = percent;
                }
            }
            if let Some(hook) = hook.lock().unwrap().as_mut() {
                hook(progress);
            }
        });

        match self.controller.upload_file(&name, payload, observer).await {
            Ok(message) => {
                info!(file = %name, "upload succeeded");
                self.catalog.insert_optimistic(&name);
                let mut inner = self.inner.lock().unwrap();
                inner.selection = None;
                inner.task.state = UploadState::Succeeded;
                inner.task.message = message.clone();
                Ok(message)
            }
            Err(err) => {
                warn!(file = %name, error = %err, "upload failed");
                let mut inner = self.inner.lock().unwrap();
                inner.task.state = UploadState::Failed;
                inner.task.message = UPLOAD_FAILED_MESSAGE.to_string();
                Err(err)
            }
        }
    }

    /// Consume a terminal task, returning it and resetting the slot to
    /// idle. Returns `None` if no terminal outcome is pending.
    pub fn acknowledge(&self) -> Option<UploadTask> {
        let mut inner = self.inner.lock().unwrap();
        match inner.task.state {
            UploadState::Succeeded | UploadState::Failed => {
                let consumed = inner.task.clone();
                inner.task.state = UploadState::Idle;
                inner.task.file_name = None;
                inner.task.message.clear();
                Some(consumed)
            }
            _ => None,
        }
    }
}
