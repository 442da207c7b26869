use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::null_as_default;
use super::{new_record_id, Amount, RecordId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Money going out of the business
    Expense,
    /// Money coming in that is not a sale (grants, refunds, interest)
    Income,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Expense => "expense",
            EntryType::Income => "income",
        }
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" => Ok(EntryType::Expense),
            "income" => Ok(EntryType::Income),
            other => Err(format!("unknown entry type '{}'", other)),
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An expense or income line in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: Amount,
    pub date: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(input: NewLedgerEntry) -> Self {
        Self {
            id: new_record_id(),
            description: input.description,
            entry_type: input.entry_type,
            category: input.category,
            amount: input.amount,
            date: input.date.unwrap_or_else(Utc::now),
        }
    }

    /// Contribution to net profit: income counts positive, expenses negative.
    pub fn signed_amount(&self) -> Amount {
        match self.entry_type {
            EntryType::Income => self.amount,
            EntryType::Expense => -self.amount,
        }
    }
}

/// Caller input for a new ledger entry. `date` defaults to now when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLedgerEntry {
    pub description: String,
    pub entry_type: EntryType,
    pub category: String,
    pub amount: Amount,
    pub date: Option<DateTime<Utc>>,
}

impl NewLedgerEntry {
    pub fn expense(amount: Amount) -> Self {
        Self::new(EntryType::Expense, amount)
    }

    pub fn income(amount: Amount) -> Self {
        Self::new(EntryType::Income, amount)
    }

    pub fn new(entry_type: EntryType, amount: Amount) -> Self {
        Self {
            description: String::new(),
            entry_type,
            category: String::new(),
            amount,
            date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}
