//! # dfsclient
//!
//! Rust client library for a distributed, fault-tolerant file-storage
//! controller.
//!
//! ## Features
//!
//! - **File catalog**: the controller's file list, kept in sync by a poll
//!   scheduler and reconciled merge-by-key with optimistic local edits.
//! - **Upload orchestration**: a single tracked multipart transfer with
//!   integer byte progress, surfaced immediately on every chunk.
//! - **Optimistic mutations**: uploads appear in the catalog before the
//!   next poll confirms them; deletes apply locally first and self-heal on
//!   the next refresh if the remote call fails.
//! - **Health monitoring**: files and nodes polled concurrently each tick;
//!   reachability is fail-closed while counts keep their last known values.
//! - **Unified scheduler**: one timer tick feeds both the catalog and the
//!   health monitor, so each endpoint is read once per interval; teardown
//!   aborts the poll task and discards late responses.
//!
//! The displayed state is eventually consistent by design: an optimistic
//! edit may diverge from the controller until the next poll tick corrects
//! it.
//!
//! ## Example
//!
//! ```no_run
//! use dfsclient::{ClientConfig, DfsClient};
//!
//! # async fn example() -> dfsclient::Result<()> {
//! // Connect (starts polling) using DFS_CONTROLLER_URL or the local default.
//! let client = DfsClient::connect(ClientConfig::from_env());
//!
//! // Upload a file; it is listed before the next poll confirms it.
//! client.select_file("report.txt", std::fs::read("report.txt").unwrap());
//! let message = client.upload().await?;
//! println!("{message}");
//!
//! for name in client.files() {
//!     println!("{} -> {}", name, client.download_url(&name));
//! }
//!
//! // Delete locally first; the controller catches up.
//! client.remove("report.txt").await?;
//!
//! let status = client.status();
//! println!("nodes: {}, files: {}", status.node_count, status.file_count);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod progress;
pub mod sync;
pub mod upload;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export commonly used types
pub use api::{Controller, ControllerClient};
pub use catalog::CatalogStore;
pub use client::DfsClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use health::{HealthMonitor, ReachabilityStatus};
pub use http::HttpClient;
pub use progress::{ProgressCallback, TransferProgress};
pub use sync::SyncScheduler;
pub use upload::{UploadOrchestrator, UploadState, UploadTask};
