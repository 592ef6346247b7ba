//! Resource Registry for Tabspace.
//!
//! Tracks the live UI instance bound to each tab. At most one handle is held
//! per tab id; any handle that is replaced or unregistered is disposed exactly
//! once. `dispose` consumes the handle, so a disposed handle cannot be reached
//! again.

use std::collections::HashMap;

use tracing::debug;

/// A live UI instance that must be torn down explicitly.
pub trait ViewHandle {
    fn dispose(self: Box<Self>);
}

/// Owns the live UI handle for each tab id.
#[derive(Default)]
pub struct ResourceRegistry {
    handles: HashMap<String, Box<dyn ViewHandle>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `handle` for `tab_id`, disposing whatever was there before.
    pub fn register(&mut self, tab_id: &str, handle: Box<dyn ViewHandle>) {
        if let Some(previous) = self.handles.insert(tab_id.to_string(), handle) {
            debug!(tab_id, "replacing live view handle");
            previous.dispose();
        }
    }

    /// Disposes and forgets the handle for `tab_id`. Returns whether one existed.
    pub fn dispose(&mut self, tab_id: &str) -> bool {
        match self.handles.remove(tab_id) {
            Some(handle) => {
                handle.dispose();
                true
            }
            None => false,
        }
    }

    /// Disposes every handle except the one for `keep`.
    pub fn dispose_except(&mut self, keep: &str) {
        let ids: Vec<String> = self
            .handles
            .keys()
            .filter(|id| id.as_str() != keep)
            .cloned()
            .collect();
        for id in ids {
            self.dispose(&id);
        }
    }

    pub fn dispose_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.dispose();
        }
    }

    pub fn contains(&self, tab_id: &str) -> bool {
        self.handles.contains_key(tab_id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for ResourceRegistry {
    fn drop(&mut self) {
        self.dispose_all();
    }
}
