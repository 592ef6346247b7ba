use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One open workspace entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: String,
    pub title: String,
    pub location: String,
    pub active: bool,
    /// Flips to true on first activation; lazy page content may render after that.
    pub loaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_position: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_state: Option<PageState>,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
}

impl Tab {
    /// A fresh, inactive, not-yet-loaded record.
    pub fn new(id: String, title: &str, location: &str, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.to_string(),
            location: location.to_string(),
            active: false,
            loaded: false,
            scroll_position: None,
            page_state: None,
            created_at: now,
            last_accessed_at: now,
        }
    }
}

/// Scratch state owned by the page that lives in a tab.
///
/// The workspace never looks inside; it stores the value and hands it back
/// unchanged. Callers pick the schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PageState(serde_json::Value);

impl PageState {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Wraps any serializable page model.
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self)
    }

    /// Decodes back into the page's own model.
    pub fn to_deserialized<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.0)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for PageState {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}
