//! Tab Manager for Tabspace.
//!
//! Owns the ordered tab collection and the single active-tab pointer. Every
//! mutation goes through here; after each one the new state is published to
//! subscribers and handed to the session manager for a best-effort write.
//! Operations on an unknown tab id are silent no-ops.

use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::SharedClock;
use crate::managers::navigation::{NavigationCoordinator, Navigator};
use crate::managers::resource_registry::{ResourceRegistry, ViewHandle};
use crate::managers::session_manager::{sanitize_snapshot, SessionManager, SessionManagerTrait};
use crate::types::events::{ActiveTabReceiver, TabsReceiver};
use crate::types::tab::{PageState, Tab};

/// Trait defining the tab management interface exposed to pages.
pub trait TabManagerTrait {
    fn open_tab(&mut self, title: &str, location: &str, reuse_if_exists: bool) -> String;
    fn activate_tab(&mut self, tab_id: &str);
    fn close_tab(&mut self, tab_id: &str);
    fn close_all_tabs(&mut self);
    fn close_other_tabs(&mut self, tab_id: &str);
    fn update_tab_title(&mut self, tab_id: &str, title: &str);
    fn save_tab_state(&mut self, tab_id: &str, state: PageState);
    fn clear_tab_state(&mut self, tab_id: &str);
    fn get_tab_state(&self, tab_id: &str) -> Option<&PageState>;
    fn save_scroll_position(&mut self, tab_id: &str, position: f64);
    fn get_scroll_position(&self, tab_id: &str) -> f64;
    fn get_tab(&self, tab_id: &str) -> Option<&Tab>;
    fn get_active_tab(&self) -> Option<&Tab>;
    fn get_all_tabs(&self) -> &[Tab];
    fn tab_count(&self) -> usize;
}

/// The workspace's tab store.
pub struct TabManager {
    tabs: Vec<Tab>,
    active_tab_id: Option<String>,
    capacity: usize,
    clock: SharedClock,
    navigation: NavigationCoordinator,
    registry: ResourceRegistry,
    session: Option<SessionManager>,
    hydrated: bool,
    tabs_tx: watch::Sender<Vec<Tab>>,
    active_tx: watch::Sender<Option<String>>,
}

impl TabManager {
    /// Creates an empty, unpersisted tab manager.
    ///
    /// `capacity` below 1 is raised to 1.
    pub fn new(
        navigator: Box<dyn Navigator>,
        home_location: &str,
        capacity: usize,
        clock: SharedClock,
    ) -> Self {
        let (tabs_tx, _) = watch::channel(Vec::new());
        let (active_tx, _) = watch::channel(None);
        Self {
            tabs: Vec::new(),
            active_tab_id: None,
            capacity: capacity.max(1),
            clock,
            navigation: NavigationCoordinator::new(navigator, home_location),
            registry: ResourceRegistry::new(),
            session: None,
            hydrated: false,
            tabs_tx,
            active_tx,
        }
    }

    /// Attaches durable persistence. Every later mutation writes a snapshot.
    pub fn with_session(mut self, session: SessionManager) -> Self {
        self.session = Some(session);
        self
    }

    /// Loads the persisted workspace, once, into an empty manager.
    ///
    /// Navigation to the restored active tab is deferred until
    /// [`TabManager::on_navigator_ready`]. Returns whether anything was restored.
    pub fn hydrate(&mut self) -> bool {
        if self.hydrated || !self.tabs.is_empty() {
            return false;
        }
        self.hydrated = true;

        let Some(snapshot) = self.session.as_ref().and_then(|s| s.restore_snapshot()) else {
            return false;
        };
        let snapshot = sanitize_snapshot(snapshot, self.capacity);
        self.tabs = snapshot.tabs;
        self.active_tab_id = snapshot.active_tab_id;

        if let Some(location) = self.get_active_tab().map(|t| t.location.clone()) {
            self.navigation.defer_navigation(&location);
        }
        info!(
            tabs = self.tabs.len(),
            active = ?self.active_tab_id,
            "workspace hydrated"
        );
        self.publish();
        true
    }

    /// The navigator finished its own setup; flush any deferred navigation.
    pub fn on_navigator_ready(&mut self) {
        self.navigation.mark_ready();
    }

    /// Re-derives the active tab after the navigator reports a location change.
    ///
    /// The tab whose location equals the navigator's current location becomes
    /// active. If none does, nothing changes.
    pub fn handle_location_changed(&mut self) {
        let location = self.navigation.current_location();
        let Some(tab_id) = NavigationCoordinator::tab_for_location(
            &self.tabs,
            self.active_tab_id.as_deref(),
            &location,
        )
        .map(|t| t.id.clone()) else {
            debug!(location = %location, "location change matched no inactive tab");
            return;
        };
        self.activate_inner(&tab_id);
        self.commit();
    }

    /// Binds a live UI instance to a tab, disposing any previous one.
    ///
    /// A handle for an unknown tab is disposed on the spot.
    pub fn register_component_ref(&mut self, tab_id: &str, handle: Box<dyn ViewHandle>) {
        if self.find_tab_index(tab_id).is_none() {
            debug!(tab_id, "disposing view handle for unknown tab");
            handle.dispose();
            return;
        }
        self.registry.register(tab_id, handle);
    }

    pub fn dispose_component_ref(&mut self, tab_id: &str) {
        self.registry.dispose(tab_id);
    }

    pub fn live_component_count(&self) -> usize {
        self.registry.len()
    }

    /// Deletes the persisted snapshot. In-memory tabs are untouched.
    pub fn clear_stored_state(&self) {
        if let Some(session) = &self.session {
            session.clear_stored_state();
        }
    }

    /// Disposes every live UI instance and writes a final snapshot.
    pub fn shutdown(&mut self) {
        self.registry.dispose_all();
        self.persist();
    }

    pub fn subscribe_tabs(&self) -> TabsReceiver {
        self.tabs_tx.subscribe()
    }

    pub fn subscribe_active_tab(&self) -> ActiveTabReceiver {
        self.active_tx.subscribe()
    }

    pub fn active_tab_id(&self) -> Option<&str> {
        self.active_tab_id.as_deref()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn pending_navigation(&self) -> Option<&str> {
        self.navigation.pending_navigation()
    }

    fn find_tab_index(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    fn find_tab_mut(&mut self, tab_id: &str) -> Option<&mut Tab> {
        let tab = self.tabs.iter_mut().find(|t| t.id == tab_id);
        if tab.is_none() {
            debug!(tab_id, "ignoring operation on unknown tab");
        }
        tab
    }

    fn activate_inner(&mut self, tab_id: &str) -> bool {
        let Some(index) = self.find_tab_index(tab_id) else {
            debug!(tab_id, "ignoring activation of unknown tab");
            return false;
        };

        let now = self.clock.now();
        for tab in &mut self.tabs {
            if tab.id == tab_id {
                tab.active = true;
                tab.last_accessed_at = tab.last_accessed_at.max(now);
            } else {
                tab.active = false;
            }
        }
        self.active_tab_id = Some(tab_id.to_string());

        let location = self.tabs[index].location.clone();
        self.navigation.navigate_if_needed(&location);
        self.tabs[index].loaded = true;
        true
    }

    fn close_inner(&mut self, tab_id: &str) -> bool {
        let Some(index) = self.find_tab_index(tab_id) else {
            debug!(tab_id, "ignoring close of unknown tab");
            return false;
        };

        self.registry.dispose(tab_id);
        let removed = self.tabs.remove(index);

        if self.tabs.is_empty() {
            self.active_tab_id = None;
            self.navigation.navigate_home();
        } else if removed.active {
            // Prefer the tab that slid into the removed slot, else the new last one.
            let next = index.min(self.tabs.len() - 1);
            let next_id = self.tabs[next].id.clone();
            self.activate_inner(&next_id);
        }
        true
    }

    /// Closes the least recently accessed inactive tab, if any.
    fn evict_oldest_inactive(&mut self) -> bool {
        let candidate = self
            .tabs
            .iter()
            .filter(|t| !t.active)
            .min_by_key(|t| t.last_accessed_at)
            .map(|t| t.id.clone());
        match candidate {
            Some(tab_id) => {
                debug!(tab_id = %tab_id, "evicting least recently used tab");
                self.close_inner(&tab_id)
            }
            None => false,
        }
    }

    /// Makes room for one more tab.
    ///
    /// With no inactive candidate (only possible at capacity 1) the active tab
    /// is dropped quietly; the new tab takes over both the slot and the focus.
    fn make_room(&mut self) {
        if self.tabs.len() < self.capacity || self.evict_oldest_inactive() {
            return;
        }
        if let Some(tab_id) = self.active_tab_id.take() {
            debug!(tab_id = %tab_id, "replacing active tab at capacity");
            self.registry.dispose(&tab_id);
            self.tabs.retain(|t| t.id != tab_id);
        }
    }

    fn publish(&self) {
        self.tabs_tx.send_replace(self.tabs.clone());
        self.active_tx.send_if_modified(|current| {
            if *current == self.active_tab_id {
                false
            } else {
                current.clone_from(&self.active_tab_id);
                true
            }
        });
    }

    fn persist(&self) {
        if let Some(session) = &self.session {
            session.save_snapshot(&self.tabs, self.active_tab_id.as_deref());
        }
    }

    fn commit(&self) {
        self.publish();
        self.persist();
    }
}

impl TabManagerTrait for TabManager {
    /// Opens a tab for `location`, or focuses the existing one when
    /// `reuse_if_exists` is set. Returns the tab's id.
    fn open_tab(&mut self, title: &str, location: &str, reuse_if_exists: bool) -> String {
        if reuse_if_exists {
            if let Some(tab_id) = self
                .tabs
                .iter()
                .find(|t| t.location == location)
                .map(|t| t.id.clone())
            {
                self.activate_inner(&tab_id);
                self.commit();
                return tab_id;
            }
        }

        self.make_room();

        let tab_id = Uuid::new_v4().to_string();
        self.tabs
            .push(Tab::new(tab_id.clone(), title, location, self.clock.now()));
        self.activate_inner(&tab_id);
        self.commit();
        tab_id
    }

    fn activate_tab(&mut self, tab_id: &str) {
        if self.activate_inner(tab_id) {
            self.commit();
        }
    }

    /// Closes a tab and releases its UI instance. Closing the active tab
    /// focuses its neighbour; closing the last one navigates home.
    fn close_tab(&mut self, tab_id: &str) {
        if self.close_inner(tab_id) {
            self.commit();
        }
    }

    /// Closes everything and purges durable storage.
    fn close_all_tabs(&mut self) {
        self.registry.dispose_all();
        self.tabs.clear();
        self.active_tab_id = None;
        self.navigation.navigate_home();
        self.publish();
        self.clear_stored_state();
    }

    fn close_other_tabs(&mut self, tab_id: &str) {
        if self.find_tab_index(tab_id).is_none() {
            debug!(tab_id, "ignoring close-others for unknown tab");
            return;
        }
        self.registry.dispose_except(tab_id);
        self.tabs.retain(|t| t.id == tab_id);
        self.activate_inner(tab_id);
        self.commit();
    }

    fn update_tab_title(&mut self, tab_id: &str, title: &str) {
        if let Some(tab) = self.find_tab_mut(tab_id) {
            tab.title = title.to_string();
            self.commit();
        }
    }

    fn save_tab_state(&mut self, tab_id: &str, state: PageState) {
        if let Some(tab) = self.find_tab_mut(tab_id) {
            tab.page_state = Some(state);
            self.commit();
        }
    }

    fn clear_tab_state(&mut self, tab_id: &str) {
        if let Some(tab) = self.find_tab_mut(tab_id) {
            tab.page_state = None;
            self.commit();
        }
    }

    fn get_tab_state(&self, tab_id: &str) -> Option<&PageState> {
        self.get_tab(tab_id).and_then(|t| t.page_state.as_ref())
    }

    fn save_scroll_position(&mut self, tab_id: &str, position: f64) {
        if let Some(tab) = self.find_tab_mut(tab_id) {
            tab.scroll_position = Some(position);
            self.commit();
        }
    }

    fn get_scroll_position(&self, tab_id: &str) -> f64 {
        self.get_tab(tab_id)
            .and_then(|t| t.scroll_position)
            .unwrap_or(0.0)
    }

    fn get_tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    fn get_active_tab(&self) -> Option<&Tab> {
        self.active_tab_id
            .as_deref()
            .and_then(|id| self.get_tab(id))
    }

    fn get_all_tabs(&self) -> &[Tab] {
        &self.tabs
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }
}
