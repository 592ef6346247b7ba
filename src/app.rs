//! App Core for Tabspace.
//!
//! Wires settings, the SQLite store, the session manager and the tab manager
//! together, and drives the startup/shutdown sequence.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::clock::{SharedClock, SystemClock};
use crate::database::kv_store::{KeyValueStore, SqliteKeyValueStore};
use crate::database::Database;
use crate::managers::navigation::Navigator;
use crate::managers::session_manager::SessionManager;
use crate::managers::tab_manager::TabManager;
use crate::platform;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::errors::AppError;
use crate::types::settings::WorkspaceSettings;

/// The assembled workspace: one tab manager for the life of the process.
pub struct App {
    pub settings: WorkspaceSettings,
    pub tab_manager: TabManager,
}

impl App {
    /// Opens the SQLite database named by `settings` and hydrates the tab
    /// manager from it.
    pub fn new(settings: WorkspaceSettings, navigator: Box<dyn Navigator>) -> Result<Self, AppError> {
        crate::logging::init();
        let db_path = settings
            .database_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(platform::default_database_path);
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Arc::new(Database::open(&db_path)?);
        info!(path = %db_path.display(), "workspace database opened");

        Ok(Self::with_store(
            settings,
            navigator,
            Box::new(SqliteKeyValueStore::new(db)),
            Arc::new(SystemClock),
        ))
    }

    /// Loads settings from `settings.json` (or `config_path`) and opens the workspace.
    pub fn from_config(config_path: Option<String>, navigator: Box<dyn Navigator>) -> Result<Self, AppError> {
        let mut engine = SettingsEngine::new(config_path);
        let settings = engine.load()?;
        Self::new(settings, navigator)
    }

    /// Builds the workspace over any key-value store and clock.
    pub fn with_store(
        settings: WorkspaceSettings,
        navigator: Box<dyn Navigator>,
        store: Box<dyn KeyValueStore>,
        clock: SharedClock,
    ) -> Self {
        crate::logging::init();
        let session = SessionManager::new(
            store,
            &settings.storage_key,
            settings.staleness_window(),
            clock.clone(),
        );
        let mut tab_manager = TabManager::new(
            navigator,
            &settings.home_location,
            settings.effective_max_tabs(),
            clock,
        )
        .with_session(session);
        tab_manager.hydrate();

        Self {
            settings,
            tab_manager,
        }
    }

    /// Startup sequence: release the restore navigation now that the host's
    /// navigator is up.
    pub fn startup(&mut self) {
        self.tab_manager.on_navigator_ready();
    }

    /// Shutdown sequence: dispose live views and flush a final snapshot.
    pub fn shutdown(&mut self) {
        self.tab_manager.shutdown();
    }
}
