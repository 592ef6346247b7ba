//! Unit tests for the TabManager: open/reuse, eviction, close neighbour
//! selection, close-all/close-others, scratch state and change streams.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use rstest::rstest;
use serde_json::json;

use tabspace::clock::ManualClock;
use tabspace::database::kv_store::{KeyValueStore, MemoryKeyValueStore};
use tabspace::managers::navigation::InMemoryNavigator;
use tabspace::managers::resource_registry::ViewHandle;
use tabspace::managers::session_manager::SessionManager;
use tabspace::managers::tab_manager::{TabManager, TabManagerTrait};
use tabspace::types::tab::PageState;

type DisposeLog = Arc<Mutex<Vec<String>>>;

struct RecordingHandle {
    name: String,
    log: DisposeLog,
}

impl ViewHandle for RecordingHandle {
    fn dispose(self: Box<Self>) {
        self.log.lock().unwrap().push(self.name.clone());
    }
}

fn handle(name: &str, log: &DisposeLog) -> Box<dyn ViewHandle> {
    Box::new(RecordingHandle {
        name: name.to_string(),
        log: log.clone(),
    })
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

struct Fixture {
    mgr: TabManager,
    nav: InMemoryNavigator,
    clock: ManualClock,
}

impl Fixture {
    fn new() -> Self {
        let nav = InMemoryNavigator::new("/");
        let clock = ManualClock::new(start());
        let mgr = TabManager::new(Box::new(nav.clone()), "/", 10, Arc::new(clock.clone()));
        Self { mgr, nav, clock }
    }

    /// Opens a tab one second after the previous action.
    fn open(&mut self, location: &str) -> String {
        self.clock.advance(Duration::seconds(1));
        self.mgr.open_tab(location, location, true)
    }

    fn ids(&self) -> Vec<String> {
        self.mgr.get_all_tabs().iter().map(|t| t.id.clone()).collect()
    }
}

// ─── open_tab ───

#[test]
fn test_open_tab_activates_loads_and_navigates() {
    let mut fx = Fixture::new();
    let id = fx.open("/customers");

    let tab = fx.mgr.get_tab(&id).unwrap();
    assert!(tab.active);
    assert!(tab.loaded);
    assert_eq!(tab.title, "/customers");
    assert_eq!(fx.mgr.active_tab_id(), Some(id.as_str()));
    assert_eq!(fx.nav.history(), vec!["/customers".to_string()]);
}

#[test]
fn test_open_tab_returns_unique_ids() {
    let mut fx = Fixture::new();
    let a = fx.open("/customers");
    let b = fx.open("/products");
    assert_ne!(a, b);
    assert_eq!(fx.mgr.tab_count(), 2);
}

#[test]
fn test_reuse_existing_tab_keeps_scratch_state() {
    let mut fx = Fixture::new();
    let create = fx.open("/customers/new");
    fx.mgr
        .save_tab_state(&create, PageState::new(json!({"formValue": {"name": "Ada"}})));
    fx.mgr.save_scroll_position(&create, 420.0);
    fx.open("/orders");

    let reused = fx.open("/customers/new");

    assert_eq!(reused, create);
    assert_eq!(fx.mgr.tab_count(), 2);
    assert_eq!(fx.mgr.active_tab_id(), Some(create.as_str()));
    assert_eq!(
        fx.mgr.get_tab_state(&create).map(|s| s.as_value().clone()),
        Some(json!({"formValue": {"name": "Ada"}}))
    );
    assert_eq!(fx.mgr.get_scroll_position(&create), 420.0);
}

#[test]
fn test_open_without_reuse_creates_duplicate_location() {
    let mut fx = Fixture::new();
    let first = fx.open("/orders/12");
    let second = fx.mgr.open_tab("Order 12", "/orders/12", false);

    assert_ne!(first, second);
    assert_eq!(fx.mgr.tab_count(), 2);
    assert_eq!(fx.mgr.active_tab_id(), Some(second.as_str()));
}

// ─── eviction ───

#[test]
fn test_eleventh_tab_evicts_oldest_inactive() {
    let mut fx = Fixture::new();
    let ids: Vec<String> = (0..10).map(|i| fx.open(&format!("/orders/{i}"))).collect();
    assert_eq!(fx.mgr.tab_count(), 10);

    let newest = fx.open("/orders/10");

    assert_eq!(fx.mgr.tab_count(), 10);
    assert!(fx.mgr.get_tab(&ids[0]).is_none());
    assert!(fx.mgr.get_tab(&ids[1]).is_some());
    assert_eq!(fx.mgr.active_tab_id(), Some(newest.as_str()));
}

#[test]
fn test_eviction_uses_last_access_not_insertion_order() {
    let mut fx = Fixture::new();
    let ids: Vec<String> = (0..10).map(|i| fx.open(&format!("/products/{i}"))).collect();

    fx.clock.advance(Duration::seconds(1));
    fx.mgr.activate_tab(&ids[0]);
    fx.open("/products/new");

    assert!(fx.mgr.get_tab(&ids[0]).is_some());
    assert!(fx.mgr.get_tab(&ids[1]).is_none());
    assert_eq!(fx.mgr.tab_count(), 10);
}

#[test]
fn test_eviction_disposes_evicted_view_handle() {
    let mut fx = Fixture::new();
    let log = DisposeLog::default();
    let ids: Vec<String> = (0..10).map(|i| fx.open(&format!("/customers/{i}"))).collect();
    fx.mgr.register_component_ref(&ids[0], handle("oldest", &log));

    fx.open("/customers/10");

    assert_eq!(*log.lock().unwrap(), vec!["oldest".to_string()]);
    assert_eq!(fx.mgr.live_component_count(), 0);
}

// ─── activate_tab ───

#[test]
fn test_activate_unknown_tab_is_noop() {
    let mut fx = Fixture::new();
    let id = fx.open("/customers");
    fx.mgr.activate_tab("missing");
    assert_eq!(fx.mgr.active_tab_id(), Some(id.as_str()));
}

#[test]
fn test_activate_skips_navigation_when_already_there() {
    let mut fx = Fixture::new();
    let id = fx.open("/customers");
    fx.mgr.activate_tab(&id);
    assert_eq!(fx.nav.history(), vec!["/customers".to_string()]);
}

#[test]
fn test_last_accessed_never_moves_backwards() {
    let mut fx = Fixture::new();
    let a = fx.open("/customers");
    fx.open("/products");
    let before = fx.mgr.get_tab(&a).unwrap().last_accessed_at;

    fx.clock.set(start() - Duration::days(1));
    fx.mgr.activate_tab(&a);

    assert_eq!(fx.mgr.get_tab(&a).unwrap().last_accessed_at, before);
}

#[test]
fn test_only_one_tab_active_after_switching() {
    let mut fx = Fixture::new();
    let a = fx.open("/customers");
    fx.open("/products");
    fx.open("/orders");
    fx.mgr.activate_tab(&a);

    let active: Vec<_> = fx.mgr.get_all_tabs().iter().filter(|t| t.active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, a);
}

// ─── close_tab ───

#[rstest]
#[case(0, 0)]
#[case(1, 1)]
#[case(2, 2)]
#[case(3, 2)]
fn test_close_active_tab_activates_neighbor(#[case] closed: usize, #[case] expected: usize) {
    let mut fx = Fixture::new();
    let ids: Vec<String> = (0..4).map(|i| fx.open(&format!("/orders/{i}"))).collect();
    fx.mgr.activate_tab(&ids[closed]);

    fx.mgr.close_tab(&ids[closed]);

    let remaining = fx.ids();
    assert_eq!(remaining.len(), 3);
    assert_eq!(fx.mgr.active_tab_id(), Some(remaining[expected].as_str()));
}

#[test]
fn test_close_inactive_tab_keeps_active() {
    let mut fx = Fixture::new();
    let a = fx.open("/customers");
    let b = fx.open("/products");
    fx.mgr.close_tab(&a);
    assert_eq!(fx.mgr.active_tab_id(), Some(b.as_str()));
    assert_eq!(fx.mgr.tab_count(), 1);
}

#[test]
fn test_close_last_tab_clears_pointer_and_goes_home() {
    let mut fx = Fixture::new();
    let id = fx.open("/customers");
    fx.mgr.close_tab(&id);

    assert_eq!(fx.mgr.tab_count(), 0);
    assert!(fx.mgr.get_active_tab().is_none());
    assert_eq!(fx.nav.history().last().map(String::as_str), Some("/"));
}

#[test]
fn test_close_twice_is_silent() {
    let mut fx = Fixture::new();
    let a = fx.open("/customers");
    fx.open("/products");
    fx.mgr.close_tab(&a);
    fx.mgr.close_tab(&a);
    assert_eq!(fx.mgr.tab_count(), 1);
}

#[test]
fn test_close_disposes_handle_exactly_once() {
    let mut fx = Fixture::new();
    let log = DisposeLog::default();
    let id = fx.open("/orders/1");
    fx.mgr.register_component_ref(&id, handle("order", &log));

    fx.mgr.close_tab(&id);
    fx.mgr.close_tab(&id);
    fx.mgr.dispose_component_ref(&id);

    assert_eq!(*log.lock().unwrap(), vec!["order".to_string()]);
}

// ─── close_all_tabs / close_other_tabs ───

#[test]
fn test_close_all_tabs_disposes_navigates_home_and_purges_storage() {
    let nav = InMemoryNavigator::new("/");
    let clock = ManualClock::new(start());
    let store = MemoryKeyValueStore::new();
    let session = SessionManager::new(
        Box::new(store.clone()),
        "tab-manager-state",
        Duration::hours(24),
        Arc::new(clock.clone()),
    );
    let mut mgr = TabManager::new(Box::new(nav.clone()), "/", 10, Arc::new(clock))
        .with_session(session);
    let log = DisposeLog::default();

    let a = mgr.open_tab("Customers", "/customers", true);
    let b = mgr.open_tab("Products", "/products", true);
    mgr.register_component_ref(&a, handle("a", &log));
    mgr.register_component_ref(&b, handle("b", &log));
    assert!(store.contains_key("tab-manager-state"));

    mgr.close_all_tabs();

    assert_eq!(mgr.tab_count(), 0);
    assert!(mgr.active_tab_id().is_none());
    assert_eq!(nav.history().last().map(String::as_str), Some("/"));
    assert_eq!(log.lock().unwrap().len(), 2);
    assert_eq!(store.get("tab-manager-state").unwrap(), None);
}

#[test]
fn test_close_other_tabs_keeps_only_target_active() {
    let mut fx = Fixture::new();
    let log = DisposeLog::default();
    let a = fx.open("/customers");
    let b = fx.open("/products");
    let c = fx.open("/orders");
    fx.mgr.register_component_ref(&a, handle("a", &log));
    fx.mgr.register_component_ref(&b, handle("b", &log));
    fx.mgr.register_component_ref(&c, handle("c", &log));

    fx.mgr.close_other_tabs(&b);

    assert_eq!(fx.ids(), vec![b.clone()]);
    assert!(fx.mgr.get_tab(&b).unwrap().active);
    assert_eq!(fx.mgr.active_tab_id(), Some(b.as_str()));
    let mut disposed = log.lock().unwrap().clone();
    disposed.sort();
    assert_eq!(disposed, vec!["a".to_string(), "c".to_string()]);
    assert_eq!(fx.mgr.live_component_count(), 1);
}

#[test]
fn test_close_other_tabs_unknown_is_noop() {
    let mut fx = Fixture::new();
    fx.open("/customers");
    fx.open("/products");
    fx.mgr.close_other_tabs("missing");
    assert_eq!(fx.mgr.tab_count(), 2);
}

// ─── scratch state ───

#[test]
fn test_scratch_accessors_for_unknown_tab() {
    let mut fx = Fixture::new();
    fx.mgr.save_scroll_position("missing", 10.0);
    fx.mgr.save_tab_state("missing", PageState::new(json!(1)));
    fx.mgr.update_tab_title("missing", "x");

    assert_eq!(fx.mgr.get_scroll_position("missing"), 0.0);
    assert!(fx.mgr.get_tab_state("missing").is_none());
}

#[test]
fn test_scroll_position_defaults_to_zero() {
    let mut fx = Fixture::new();
    let id = fx.open("/customers");
    assert_eq!(fx.mgr.get_scroll_position(&id), 0.0);
}

#[test]
fn test_update_title_and_clear_state() {
    let mut fx = Fixture::new();
    let id = fx.open("/orders/7");
    fx.mgr.update_tab_title(&id, "Order #7");
    fx.mgr.save_tab_state(&id, PageState::new(json!({"submitted": true})));
    fx.mgr.clear_tab_state(&id);

    assert_eq!(fx.mgr.get_tab(&id).unwrap().title, "Order #7");
    assert!(fx.mgr.get_tab_state(&id).is_none());
}

// ─── change streams ───

#[test]
fn test_subscribers_see_latest_tabs_and_active_id() {
    let mut fx = Fixture::new();
    let tabs_rx = fx.mgr.subscribe_tabs();
    let active_rx = fx.mgr.subscribe_active_tab();

    let a = fx.open("/customers");
    fx.open("/products");
    fx.mgr.activate_tab(&a);

    assert!(tabs_rx.has_changed().unwrap());
    assert_eq!(tabs_rx.borrow().len(), 2);
    assert_eq!(active_rx.borrow().as_deref(), Some(a.as_str()));
}

// ─── component refs ───

#[test]
fn test_register_twice_disposes_first_handle() {
    let mut fx = Fixture::new();
    let log = DisposeLog::default();
    let id = fx.open("/customers");

    fx.mgr.register_component_ref(&id, handle("first", &log));
    assert!(log.lock().unwrap().is_empty());
    fx.mgr.register_component_ref(&id, handle("second", &log));

    assert_eq!(*log.lock().unwrap(), vec!["first".to_string()]);
    assert_eq!(fx.mgr.live_component_count(), 1);
}

#[test]
fn test_register_for_unknown_tab_disposes_immediately() {
    let mut fx = Fixture::new();
    let log = DisposeLog::default();
    fx.mgr.register_component_ref("missing", handle("orphan", &log));
    assert_eq!(*log.lock().unwrap(), vec!["orphan".to_string()]);
    assert_eq!(fx.mgr.live_component_count(), 0);
}
