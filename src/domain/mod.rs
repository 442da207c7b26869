mod document;
mod entry;
mod inventory;
mod ledger;
mod money;
mod sale;
mod settings;
mod transaction;

pub use document::*;
pub use entry::*;
pub use inventory::*;
pub use ledger::*;
pub use money::*;
pub use sale::*;
pub use settings::*;
pub use transaction::*;
