use thiserror::Error;

// === StorageError ===

/// Errors raised by a durable key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The SQLite layer rejected the operation.
    #[error("Storage database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// The store cannot be reached at all.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    /// The store refused a write because it is full.
    #[error("Storage quota exceeded for key: {0}")]
    QuotaExceeded(String),
}

// === SessionError ===

/// Errors related to persisting and restoring workspace snapshots.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The snapshot is older than the staleness window.
    #[error("Session snapshot is stale (written {age_hours}h ago)")]
    Stale { age_hours: i64 },
}

// === SettingsError ===

/// Errors related to workspace settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings I/O error: {0}")]
    IoError(String),
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === AppError ===

/// Errors raised while wiring the workspace together at startup.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to open workspace database: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Failed to create data directory: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
