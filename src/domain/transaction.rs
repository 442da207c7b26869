use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Amount, EntryType, LedgerEntry, RecordId, SaleRecord};

/// One row of the activity feed: either a sale or a ledger entry.
/// Serializes as the underlying record, unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Transaction {
    Sale(SaleRecord),
    Entry(LedgerEntry),
}

impl Transaction {
    pub fn id(&self) -> &RecordId {
        match self {
            Transaction::Sale(s) => &s.id,
            Transaction::Entry(e) => &e.id,
        }
    }

    pub fn date(&self) -> DateTime<Utc> {
        match self {
            Transaction::Sale(s) => s.date,
            Transaction::Entry(e) => e.date,
        }
    }

    pub fn amount(&self) -> Amount {
        match self {
            Transaction::Sale(s) => s.amount,
            Transaction::Entry(e) => e.amount,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Transaction::Sale(_) => "Sale",
            Transaction::Entry(e) => match e.entry_type {
                EntryType::Expense => "Expense",
                EntryType::Income => "Income",
            },
        }
    }

    /// Effect on net profit.
    pub fn signed_amount(&self) -> Amount {
        match self {
            Transaction::Sale(s) => s.amount,
            Transaction::Entry(e) => e.signed_amount(),
        }
    }
}

impl From<SaleRecord> for Transaction {
    fn from(sale: SaleRecord) -> Self {
        Transaction::Sale(sale)
    }
}

impl From<LedgerEntry> for Transaction {
    fn from(entry: LedgerEntry) -> Self {
        Transaction::Entry(entry)
    }
}
