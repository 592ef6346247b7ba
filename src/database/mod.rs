//! Tabspace durable storage layer.
//!
//! SQLite connection management, schema migrations, and the key-value
//! stores that workspace snapshots are written to.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use tabspace::database::{Database, KeyValueStore, SqliteKeyValueStore};
//!
//! let db = Arc::new(Database::open("workspace.db").expect("failed to open database"));
//! let store = SqliteKeyValueStore::new(db);
//! store.set("greeting", "hello").expect("write failed");
//! ```

pub mod connection;
pub mod kv_store;
pub mod migrations;

pub use connection::Database;
pub use kv_store::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
