// Tabspace state managers
// Managers handle stateful operations: tabs, navigation sync, session persistence, live view handles.

pub mod navigation;
pub mod resource_registry;
pub mod session_manager;
pub mod tab_manager;
