//! Session Manager for Tabspace.
//!
//! Writes the whole workspace (tabs, active id, write time) as one JSON
//! snapshot under a single key, and reads it back once at startup. Writes are
//! best-effort: failures are logged and swallowed so a tab operation never
//! fails because storage did. On restore, a snapshot older than the staleness
//! window, or one that fails to parse, is deleted and treated as absent.

use std::collections::HashSet;

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::clock::SharedClock;
use crate::database::kv_store::KeyValueStore;
use crate::types::errors::SessionError;
use crate::types::session::WorkspaceSnapshot;
use crate::types::tab::Tab;

/// Trait defining session persistence operations.
pub trait SessionManagerTrait {
    fn save_snapshot(&self, tabs: &[Tab], active_tab_id: Option<&str>);
    fn restore_snapshot(&self) -> Option<WorkspaceSnapshot>;
    fn clear_stored_state(&self);
    fn has_snapshot(&self) -> bool;
}

/// Snapshot persistence over a [`KeyValueStore`].
pub struct SessionManager {
    store: Box<dyn KeyValueStore>,
    storage_key: String,
    staleness_window: Duration,
    clock: SharedClock,
}

impl SessionManager {
    pub fn new(
        store: Box<dyn KeyValueStore>,
        storage_key: &str,
        staleness_window: Duration,
        clock: SharedClock,
    ) -> Self {
        Self {
            store,
            storage_key: storage_key.to_string(),
            staleness_window,
            clock,
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Serializes and writes a snapshot, surfacing the failure.
    pub fn try_save(&self, tabs: &[Tab], active_tab_id: Option<&str>) -> Result<(), SessionError> {
        let snapshot = WorkspaceSnapshot {
            tabs: tabs.to_vec(),
            active_tab_id: active_tab_id.map(str::to_string),
            timestamp: self.clock.now(),
        };
        let json = serde_json::to_string(&snapshot)?;
        self.store.set(&self.storage_key, &json)?;
        Ok(())
    }

    /// Reads, parses and age-checks the stored snapshot.
    ///
    /// `Ok(None)` means nothing is stored. Staleness and parse failures come
    /// back as errors; the caller decides whether to purge.
    pub fn try_restore(&self) -> Result<Option<WorkspaceSnapshot>, SessionError> {
        let Some(raw) = self.store.get(&self.storage_key)? else {
            return Ok(None);
        };
        let snapshot: WorkspaceSnapshot = serde_json::from_str(&raw)?;
        let age = self.clock.now() - snapshot.timestamp;
        if age > self.staleness_window {
            return Err(SessionError::Stale {
                age_hours: age.num_hours(),
            });
        }
        Ok(Some(snapshot))
    }

    fn purge(&self) {
        if let Err(e) = self.store.remove(&self.storage_key) {
            warn!(key = %self.storage_key, error = %e, "failed to delete stored workspace state");
        }
    }
}

impl SessionManagerTrait for SessionManager {
    fn save_snapshot(&self, tabs: &[Tab], active_tab_id: Option<&str>) {
        match self.try_save(tabs, active_tab_id) {
            Ok(()) => debug!(tabs = tabs.len(), "workspace state saved"),
            Err(e) => warn!(error = %e, "failed to save workspace state"),
        }
    }

    fn restore_snapshot(&self) -> Option<WorkspaceSnapshot> {
        match self.try_restore() {
            Ok(Some(snapshot)) => {
                info!(tabs = snapshot.tabs.len(), "restored workspace state");
                Some(snapshot)
            }
            Ok(None) => None,
            Err(SessionError::Storage(e)) => {
                warn!(error = %e, "failed to read stored workspace state");
                None
            }
            Err(e) => {
                warn!(error = %e, "discarding stored workspace state");
                self.purge();
                None
            }
        }
    }

    fn clear_stored_state(&self) {
        self.purge();
    }

    fn has_snapshot(&self) -> bool {
        matches!(self.store.get(&self.storage_key), Ok(Some(_)))
    }
}

/// Brings a restored snapshot back in line with the workspace invariants.
///
/// Duplicate ids keep their first occurrence. The `active` flags follow
/// `active_tab_id`; a missing or dangling active id falls back to the most
/// recently accessed tab. Tabs beyond `capacity` are shed oldest-inactive first.
pub fn sanitize_snapshot(snapshot: WorkspaceSnapshot, capacity: usize) -> WorkspaceSnapshot {
    let mut seen = HashSet::new();
    let mut tabs: Vec<Tab> = snapshot
        .tabs
        .into_iter()
        .filter(|t| seen.insert(t.id.clone()))
        .collect();

    let active_tab_id = snapshot
        .active_tab_id
        .filter(|id| tabs.iter().any(|t| &t.id == id))
        .or_else(|| most_recently_accessed(&tabs));
    for tab in &mut tabs {
        tab.active = active_tab_id.as_deref() == Some(tab.id.as_str());
        tab.loaded |= tab.active;
    }

    while tabs.len() > capacity.max(1) {
        let oldest = tabs
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.active)
            .min_by_key(|(_, t)| t.last_accessed_at)
            .map(|(i, _)| i);
        match oldest {
            Some(index) => {
                let dropped = tabs.remove(index);
                debug!(tab_id = %dropped.id, "dropping restored tab over capacity");
            }
            None => break,
        }
    }

    WorkspaceSnapshot {
        tabs,
        active_tab_id,
        timestamp: snapshot.timestamp,
    }
}

/// Id of the tab accessed last. Ties go to the earliest tab.
fn most_recently_accessed(tabs: &[Tab]) -> Option<String> {
    tabs.iter()
        .rev()
        .max_by_key(|t| t.last_accessed_at)
        .map(|t| t.id.clone())
}
