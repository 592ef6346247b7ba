//! Tabspace: a bounded multi-tab workspace manager.
//!
//! Keeps several pages open at once, each with its own location, scroll
//! position and page state, syncs the active tab with the host's navigator,
//! and persists the workspace so it survives a restart.
//!
//! This library crate exposes all modules for use by hosts and integration tests.

pub mod app;
pub mod clock;
pub mod database;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod services;
pub mod types;
