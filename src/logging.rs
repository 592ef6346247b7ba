//! Process-level logging setup.

use std::sync::OnceLock;

static INIT: OnceLock<()> = OnceLock::new();

fn parse_level(raw: Option<String>) -> tracing::Level {
    match raw
        .unwrap_or_else(|| "info".to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}

/// Installs a fmt subscriber with the level from `TABSPACE_LOG`.
///
/// Only the first call has an effect. Never fails: if the host already
/// installed a subscriber, that one stays.
pub fn init() {
    INIT.get_or_init(|| {
        let level = parse_level(std::env::var("TABSPACE_LOG").ok());
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .try_init();
    });
}

/// Whether [`init`] has run in this process.
pub fn is_initialized() -> bool {
    INIT.get().is_some()
}
