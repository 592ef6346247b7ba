// Tabspace platform paths
// Config and data locations follow each OS's conventions via the `dirs` crate,
// with a temp-dir fallback when the home directory is unknown.

use std::path::PathBuf;

const APP_DIR: &str = "tabspace";

/// Directory holding `settings.json`.
///
/// - **Linux**: `$XDG_CONFIG_HOME/tabspace` or `~/.config/tabspace`
/// - **macOS**: `~/Library/Application Support/tabspace`
/// - **Windows**: `%APPDATA%\tabspace`
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

/// Directory holding the workspace database.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

/// Default location of the SQLite file backing workspace snapshots.
pub fn default_database_path() -> PathBuf {
    data_dir().join("workspace.db")
}
