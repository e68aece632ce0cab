//! Local file catalog, reconciled against the controller by poll.
//!
//! The catalog holds the file names as of the last successful poll plus any
//! optimistic local edits. Reconciliation is merge-by-key: an optimistic
//! append stays visible until the controller confirms it or until it has
//! been missing from one authoritative list (bounded staleness). Optimistic
//! deletes are not tombstoned, so a later authoritative list containing the
//! name restores it.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::api::Controller;
use crate::error::Result;

/// Number of authoritative lists an optimistic entry may be missing from
/// before it is dropped.
const PENDING_MISS_LIMIT: u8 = 1;

#[derive(Debug)]
struct PendingEntry {
    name: String,
    /// Authoritative lists this entry has been missing from.
    misses: u8,
}

#[derive(Debug, Default)]
struct CatalogState {
    /// Names from the last successful poll, in server order.
    confirmed: Vec<String>,
    /// Optimistic appends not yet confirmed by the controller.
    pending: Vec<PendingEntry>,
    /// Set when the last refresh attempt failed.
    stale: bool,
}

/// Store of file names known to the client.
pub struct CatalogStore {
    controller: Arc<dyn Controller>,
    state: Mutex<CatalogState>,
}

impl CatalogStore {
    /// Create an empty catalog backed by the given controller.
    pub fn new(controller: Arc<dyn Controller>) -> Self {
        Self {
            controller,
            state: Mutex::new(CatalogState::default()),
        }
    }

    /// Current known names: confirmed entries in server order, followed by
    /// unconfirmed optimistic appends. Never contains duplicates.
    pub fn list(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        let mut names = state.confirmed.clone();
        for entry in &state.pending {
            if !names.iter().any(|n| n == &entry.name) {
                names.push(entry.name.clone());
            }
        }
        names
    }

    /// Whether the last refresh attempt failed, leaving the list stale.
    pub fn is_stale(&self) -> bool {
        self.state.lock().unwrap().stale
    }

    /// Fetch the authoritative name list and reconcile.
    ///
    /// On failure the previous list is left untouched and the stale flag is
    /// raised: stale-but-present beats empty.
    pub async fn refresh(&self) -> Result<()> {
        match self.controller.list_files().await {
            Ok(files) => {
                self.apply_authoritative(files);
                Ok(())
            }
            Err(err) => {
                self.mark_stale();
                Err(err)
            }
        }
    }

    /// Reconcile an authoritative name list fetched elsewhere (the scheduler
    /// fetches `/files` once per tick for both consumers).
    pub(crate) fn apply_authoritative(&self, files: Vec<String>) {
        let files = dedup_in_order(files);
        let mut state = self.state.lock().unwrap();

        state.pending.retain_mut(|entry| {
            if files.iter().any(|f| f == &entry.name) {
                // Confirmed by the controller; the authoritative entry
                // takes over.
                return false;
            }
            entry.misses += 1;
            if entry.misses > PENDING_MISS_LIMIT {
                debug!(file = %entry.name, "dropping unconfirmed optimistic entry");
                return false;
            }
            true
        });

        state.confirmed = files;
        state.stale = false;
    }

    /// Record that a refresh attempt failed without touching the list.
    pub(crate) fn mark_stale(&self) {
        self.state.lock().unwrap().stale = true;
    }

    /// Record a name ahead of server confirmation (optimistic append).
    pub fn insert_optimistic(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        if state.confirmed.iter().any(|n| n == name)
            || state.pending.iter().any(|e| e.name == name)
        {
            return;
        }
        state.pending.push(PendingEntry {
            name: name.to_string(),
            misses: 0,
        });
    }

    /// Remove a name locally, then ask the controller to delete it.
    ///
    /// The local removal is never rolled back: if the remote delete fails
    /// the catalog diverges from the server until the next refresh corrects
    /// it. The failure is logged and returned for callers that want to
    /// surface it.
    pub async fn remove(&self, name: &str) -> Result<()> {
        {
            let mut state = self.state.lock().unwrap();
            state.confirmed.retain(|n| n != name);
            state.pending.retain(|e| e.name != name);
        }

        if let Err(err) = self.controller.delete_file(name).await {
            warn!(file = %name, error = %err, "remote delete failed; next refresh corrects the catalog");
            return Err(err);
        }
        Ok(())
    }
}

/// Keep the first occurrence of each name, preserving server order.
fn dedup_in_order(names: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(names.len());
    for name in names {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}
