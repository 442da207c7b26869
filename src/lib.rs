pub mod application;
pub mod cli;
pub mod domain;
pub mod io;
pub mod storage;

pub use application::{LedgerStore, StoreConfig, StoreError};
pub use domain::*;
pub use storage::{DocumentBackend, MemoryBackend, SqliteBackend};
