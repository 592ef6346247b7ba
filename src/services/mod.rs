// Tabspace services
// Stateless or file-backed helpers used while wiring the workspace.

pub mod settings_engine;
