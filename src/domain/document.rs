use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::{InventoryItem, LedgerEntry, SaleRecord, Settings};

/// Record identifiers are opaque strings. Freshly created records get a UUIDv7,
/// which sorts by creation time; imported ids are kept in whatever shape they had.
pub type RecordId = String;

pub fn new_record_id() -> RecordId {
    Uuid::now_v7().to_string()
}

/// Field deserializer that reads an explicit `null` as the type's default.
///
/// Documents written by the browser app store `null` wherever a number input
/// was left blank (`JSON.stringify(NaN)`), and such records count as zero.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The single persisted root: every collection plus settings.
///
/// Every top-level key defaults when missing, so a document read from storage
/// is always well-formed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(default)]
    pub expenses: Vec<LedgerEntry>,
    #[serde(default)]
    pub sales: Vec<SaleRecord>,
    #[serde(default)]
    pub settings: Settings,
}

impl Document {
    pub fn from_json(blob: &str) -> serde_json::Result<Self> {
        serde_json::from_str(blob)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Human-readable dump with two-space indentation.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
