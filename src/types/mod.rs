// Tabspace shared type definitions
// Each submodule defines types used across the workspace manager.

pub mod errors;
pub mod events;
pub mod session;
pub mod settings;
pub mod tab;
