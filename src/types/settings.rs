use serde::{Deserialize, Serialize};

/// Tunables for the workspace: capacity, persistence and navigation defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Upper bound on open tabs. Values below 1 are treated as 1.
    pub max_tabs: usize,
    /// Persisted snapshots older than this are discarded on startup.
    pub staleness_hours: i64,
    pub storage_key: String,
    /// Where to navigate once the last tab is gone.
    pub home_location: String,
    /// SQLite file for durable state. `None` uses the platform data dir.
    pub database_path: Option<String>,
}

pub const DEFAULT_MAX_TABS: usize = 10;
pub const DEFAULT_STALENESS_HOURS: i64 = 24;
pub const DEFAULT_STORAGE_KEY: &str = "tab-manager-state";
pub const DEFAULT_HOME_LOCATION: &str = "/";

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            max_tabs: DEFAULT_MAX_TABS,
            staleness_hours: DEFAULT_STALENESS_HOURS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            home_location: DEFAULT_HOME_LOCATION.to_string(),
            database_path: None,
        }
    }
}

impl WorkspaceSettings {
    /// Capacity with the lower clamp applied.
    pub fn effective_max_tabs(&self) -> usize {
        self.max_tabs.max(1)
    }

    pub fn staleness_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.staleness_hours.max(0))
    }
}
