//! Navigation Coordinator for Tabspace.
//!
//! Keeps "which tab is active" and "where the navigator is" in step in both
//! directions. Activating a tab navigates to it; a location change reported by
//! the navigator activates the tab that owns that location. The loop between
//! the two is broken by one rule: a navigation command is only issued when the
//! target differs from the navigator's current location.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::types::tab::Tab;

/// The host's router/navigation layer.
pub trait Navigator {
    fn current_location(&self) -> String;
    fn navigate_to(&mut self, location: &str);
}

/// Drives a [`Navigator`] on behalf of the tab manager.
pub struct NavigationCoordinator {
    navigator: Box<dyn Navigator>,
    home_location: String,
    ready: bool,
    pending: Option<String>,
}

impl NavigationCoordinator {
    pub fn new(navigator: Box<dyn Navigator>, home_location: &str) -> Self {
        Self {
            navigator,
            home_location: home_location.to_string(),
            ready: false,
            pending: None,
        }
    }

    pub fn current_location(&self) -> String {
        self.navigator.current_location()
    }

    pub fn home_location(&self) -> &str {
        &self.home_location
    }

    /// Navigates to `location` unless the navigator is already there.
    ///
    /// Returns whether a command was issued. Skipping the redundant command is
    /// what keeps a navigator-triggered activation from navigating again.
    /// Any deferred navigation is superseded.
    pub fn navigate_if_needed(&mut self, location: &str) -> bool {
        self.pending = None;
        if self.navigator.current_location() == location {
            debug!(location, "navigator already at target, skipping navigation");
            return false;
        }
        debug!(location, "navigating");
        self.navigator.navigate_to(location);
        true
    }

    pub fn navigate_home(&mut self) -> bool {
        let home = self.home_location.clone();
        self.navigate_if_needed(&home)
    }

    /// Holds a navigation until the navigator reports ready.
    ///
    /// A later call replaces an earlier pending target. If the navigator is
    /// already ready, the command goes out immediately.
    pub fn defer_navigation(&mut self, location: &str) {
        if self.ready {
            self.navigate_if_needed(location);
        } else {
            self.pending = Some(location.to_string());
        }
    }

    /// Marks the navigator ready and flushes any deferred navigation.
    pub fn mark_ready(&mut self) {
        self.ready = true;
        if let Some(location) = self.pending.take() {
            self.navigate_if_needed(&location);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn pending_navigation(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Finds the tab that should become active after the navigator moved to
    /// `location`. `None` when no tab owns the location or the active tab
    /// already does, even if an older duplicate shares it. A location without
    /// a tab never creates one.
    pub fn tab_for_location<'a>(
        tabs: &'a [Tab],
        active_tab_id: Option<&str>,
        location: &str,
    ) -> Option<&'a Tab> {
        let active_matches = tabs
            .iter()
            .any(|t| Some(t.id.as_str()) == active_tab_id && t.location == location);
        if active_matches {
            return None;
        }
        tabs.iter().find(|t| t.location == location)
    }
}

#[derive(Debug)]
struct NavigatorState {
    current: String,
    history: Vec<String>,
    notifications: Vec<String>,
}

/// A navigator that only records where it has been told to go.
///
/// Clones share state, so a test or host can keep one clone and hand the other
/// to the tab manager. Every `navigate_to` queues a location-change
/// notification, retrieved with [`InMemoryNavigator::drain_notifications`]
/// and fed back through `TabManager::handle_location_changed`.
#[derive(Debug, Clone)]
pub struct InMemoryNavigator {
    state: Arc<Mutex<NavigatorState>>,
}

impl InMemoryNavigator {
    pub fn new(initial_location: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(NavigatorState {
                current: initial_location.to_string(),
                history: Vec::new(),
                notifications: Vec::new(),
            })),
        }
    }

    /// Every location `navigate_to` was called with, in order.
    pub fn history(&self) -> Vec<String> {
        self.with_state(|s| s.history.clone())
    }

    /// Moves the navigator without going through the tab manager, as a
    /// back button or a typed address would.
    pub fn simulate_external_navigation(&self, location: &str) {
        self.with_state(|s| {
            s.current = location.to_string();
            s.notifications.push(location.to_string());
        });
    }

    pub fn drain_notifications(&self) -> Vec<String> {
        self.with_state(|s| std::mem::take(&mut s.notifications))
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut NavigatorState) -> R) -> R {
        match self.state.lock() {
            Ok(mut state) => f(&mut state),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl Navigator for InMemoryNavigator {
    fn current_location(&self) -> String {
        self.with_state(|s| s.current.clone())
    }

    fn navigate_to(&mut self, location: &str) {
        self.with_state(|s| {
            s.current = location.to_string();
            s.history.push(location.to_string());
            s.notifications.push(location.to_string());
        });
    }
}
