mod backend;
mod sqlite;

pub use backend::*;
pub use sqlite::*;

/// SQL migration for the key/value slot table
pub const MIGRATION_001_KV_STORE: &str = include_str!("migrations/001_kv_store.sql");

/// Slot under which the whole document is persisted.
pub const DOCUMENT_KEY: &str = "bizledger.document";
