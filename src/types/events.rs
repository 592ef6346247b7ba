use super::tab::Tab;

/// Latest published view of the workspace for UI binding.
///
/// Both streams have latest-value semantics: a subscriber always sees the
/// current value first, then every change after it.
pub type TabsReceiver = tokio::sync::watch::Receiver<Vec<Tab>>;
pub type ActiveTabReceiver = tokio::sync::watch::Receiver<Option<String>>;
