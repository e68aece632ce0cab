//! Scripted fake controller shared by the component tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Notify;

use crate::api::{ByteProgress, Controller};
use crate::error::{ClientError, Result};

/// Fake [`Controller`] driven by queued per-endpoint results.
///
/// An empty queue yields a benign default (empty list, generic ack) so
/// tests only script the calls they care about.
#[derive(Default)]
pub(crate) struct FakeController {
    files: Mutex<VecDeque<Result<Vec<String>>>>,
    nodes: Mutex<VecDeque<Result<Vec<String>>>>,
    uploads: Mutex<VecDeque<Result<String>>>,
    deletes: Mutex<VecDeque<Result<()>>>,
    /// Names passed to `delete_file`, in call order.
    pub deleted: Mutex<Vec<String>>,
    pub files_calls: AtomicUsize,
    pub nodes_calls: AtomicUsize,
    /// When set, `upload_file` waits on this before completing.
    pub upload_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_files(&self, result: Result<Vec<String>>) {
        self.files.lock().unwrap().push_back(result);
    }

    pub fn push_nodes(&self, result: Result<Vec<String>>) {
        self.nodes.lock().unwrap().push_back(result);
    }

    pub fn push_upload(&self, result: Result<String>) {
        self.uploads.lock().unwrap().push_back(result);
    }

    pub fn push_delete(&self, result: Result<()>) {
        self.deletes.lock().unwrap().push_back(result);
    }

    pub fn gate_uploads(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.upload_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }
}

/// Stand-in for a transport-level failure.
pub(crate) fn network_error() -> ClientError {
    ClientError::Http {
        status: 502,
        body: "bad gateway".to_string(),
    }
}

pub(crate) fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[async_trait]
impl Controller for FakeController {
    async fn list_files(&self) -> Result<Vec<String>> {
        self.files_calls.fetch_add(1, Ordering::SeqCst);
        self.files
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_nodes(&self) -> Result<Vec<String>> {
        self.nodes_calls.fetch_add(1, Ordering::SeqCst);
        self.nodes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn upload_file(
        &self,
        _name: &str,
        payload: Bytes,
        mut on_progress: ByteProgress,
    ) -> Result<String> {
        let gate = self.upload_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let result = self
            .uploads
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("stored".to_string()));

        // Emit byte progress the way the chunked transport would: all
        // chunks on success, a partial prefix on failure.
        let total = payload.len() as u64;
        let steps: &[u64] = if result.is_ok() { &[1, 2, 3, 4] } else { &[1, 2] };
        for step in steps {
            on_progress(total * step / 4, total);
        }

        result
    }

    async fn delete_file(&self, name: &str) -> Result<()> {
        self.deleted.lock().unwrap().push(name.to_string());
        self.deletes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}
