// Application layer: the ledger store and the report shapes it produces.
// Front-ends (the CLI today) talk to `LedgerStore` only.

pub mod error;
mod reporting;
mod store;

pub use error::*;
pub use reporting::*;
pub use store::*;
