use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::null_as_default;
use super::{new_record_id, Amount, RecordId};

/// Customer name recorded when a sale is entered without one.
pub const WALK_IN_CUSTOMER: &str = "Walk-in";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: Amount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payment_method: String,
    /// Free-text description of what was sold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<String>,
    pub date: DateTime<Utc>,
}

impl SaleRecord {
    pub fn new(input: NewSale) -> Self {
        let customer = if input.customer.trim().is_empty() {
            WALK_IN_CUSTOMER.to_string()
        } else {
            input.customer
        };
        let items = input.items.filter(|s| !s.trim().is_empty());

        Self {
            id: new_record_id(),
            customer,
            amount: input.amount,
            payment_method: input.payment_method,
            items,
            date: input.date.unwrap_or_else(Utc::now),
        }
    }
}

/// Caller input for a new sale. `date` defaults to now when absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSale {
    pub customer: String,
    pub amount: Amount,
    pub payment_method: String,
    pub items: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl NewSale {
    pub fn new(customer: impl Into<String>, amount: Amount) -> Self {
        Self {
            customer: customer.into(),
            amount,
            ..Self::default()
        }
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = method.into();
        self
    }

    pub fn with_items(mut self, items: impl Into<String>) -> Self {
        self.items = Some(items.into());
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}
