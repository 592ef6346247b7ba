use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tab::Tab;

/// Everything written under the single durable key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    pub tabs: Vec<Tab>,
    pub active_tab_id: Option<String>,
    /// Write time; drives the staleness check on restore.
    pub timestamp: DateTime<Utc>,
}
