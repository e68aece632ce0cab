//! Controller reachability monitor.
//!
//! Each poll issues the files and nodes reads concurrently and joins both.
//! The policy is fail-closed: reachability is true only when both reads
//! succeed. Counts are only updated on a fully successful poll, so a red
//! indicator can sit next to the last known numbers.

use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::api::Controller;
use crate::error::Result;

/// Reason string shown while the controller cannot be reached.
pub const UNREACHABLE_MESSAGE: &str = "controller unreachable";

/// Derived reachability signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachabilityStatus {
    /// True when the last poll completed both reads successfully.
    pub reachable: bool,
    /// Storage node count as of the last fully successful poll.
    pub node_count: usize,
    /// File count as of the last fully successful poll.
    pub file_count: usize,
    /// Failure reason, present only while unreachable.
    pub reason: Option<String>,
}

impl Default for ReachabilityStatus {
    /// Before the first poll resolves the indicator reads as online with
    /// zero counts, matching the controller dashboard's initial render.
    fn default() -> Self {
        Self {
            reachable: true,
            node_count: 0,
            file_count: 0,
            reason: None,
        }
    }
}

/// Monitor deriving a single reachability signal from two reads.
pub struct HealthMonitor {
    controller: Arc<dyn Controller>,
    status: Mutex<ReachabilityStatus>,
}

impl HealthMonitor {
    /// Create a monitor backed by the given controller.
    pub fn new(controller: Arc<dyn Controller>) -> Self {
        Self {
            controller,
            status: Mutex::new(ReachabilityStatus::default()),
        }
    }

    /// Snapshot of the current status.
    pub fn status(&self) -> ReachabilityStatus {
        self.status.lock().unwrap().clone()
    }

    /// Issue both reads concurrently and derive reachability.
    pub async fn poll_once(&self) {
        let (files, nodes) = tokio::join!(self.controller.list_files(), self.controller.list_nodes());
        self.apply(files.map(|f| f.len()), nodes.map(|n| n.len()));
    }

    /// Fold one poll's results into the status.
    pub(crate) fn apply(&self, files: Result<usize>, nodes: Result<usize>) {
        let mut status = self.status.lock().unwrap();
        match (files, nodes) {
            (Ok(file_count), Ok(node_count)) => {
                *status = ReachabilityStatus {
                    reachable: true,
                    node_count,
                    file_count,
                    reason: None,
                };
            }
            (files, nodes) => {
                // Partial success is treated as full outage; counts keep
                // their last known values.
                if let Err(err) = &files {
                    warn!(error = %err, "files poll failed");
                }
                if let Err(err) = &nodes {
                    warn!(error = %err, "nodes poll failed");
                }
                status.reachable = false;
                status.reason = Some(UNREACHABLE_MESSAGE.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{names, network_error, FakeController};

    #[tokio::test]
    async fn test_reachable_when_both_reads_succeed() {
        let controller = Arc::new(FakeController::new());
        controller.push_files(Ok(names(&["a.txt", "b.txt", "c.txt"])));
        controller.push_nodes(Ok(names(&["http://node1:9001", "http://node2:9002"])));
        let monitor = HealthMonitor::new(Arc::clone(&controller) as Arc<dyn crate::api::Controller>);

        monitor.poll_once().await;

        let status = monitor.status();
        assert!(status.reachable);
        assert_eq!(status.file_count, 3);
        assert_eq!(status.node_count, 2);
        assert!(status.reason.is_none());
    }

    #[tokio::test]
    async fn test_partial_failure_is_full_outage() {
        let controller = Arc::new(FakeController::new());
        controller.push_files(Ok(names(&["a.txt"])));
        controller.push_nodes(Ok(names(&["n1"])));
        // Second poll: files succeeds, nodes fails.
        controller.push_files(Ok(names(&["a.txt", "b.txt"])));
        controller.push_nodes(Err(network_error()));
        let monitor = HealthMonitor::new(Arc::clone(&controller) as Arc<dyn crate::api::Controller>);

        monitor.poll_once().await;
        monitor.poll_once().await;

        let status = monitor.status();
        assert!(!status.reachable);
        assert_eq!(status.reason.as_deref(), Some(UNREACHABLE_MESSAGE));
        // Counts keep the last fully successful values, not the partial one.
        assert_eq!(status.file_count, 1);
        assert_eq!(status.node_count, 1);
    }

    #[tokio::test]
    async fn test_recovery_clears_reason_and_updates_counts() {
        let controller = Arc::new(FakeController::new());
        controller.push_files(Err(network_error()));
        controller.push_nodes(Err(network_error()));
        controller.push_files(Ok(names(&["a.txt"])));
        controller.push_nodes(Ok(names(&["n1", "n2"])));
        let monitor = HealthMonitor::new(Arc::clone(&controller) as Arc<dyn crate::api::Controller>);

        monitor.poll_once().await;
        assert!(!monitor.status().reachable);

        monitor.poll_once().await;
        let status = monitor.status();
        assert!(status.reachable);
        assert!(status.reason.is_none());
        assert_eq!(status.file_count, 1);
        assert_eq!(status.node_count, 2);
    }

    #[test]
    fn test_initial_status() {
        let status = ReachabilityStatus::default();
        assert!(status.reachable);
        assert_eq!(status.node_count, 0);
        assert_eq!(status.file_count, 0);
    }
}
