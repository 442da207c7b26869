use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::null_as_default;
use super::{new_record_id, Amount, RecordId};

/// A stocked product. `stock` and `min_stock` are signed on purpose: the store
/// records whatever the caller hands it and never clamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sku: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub min_stock: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Amount,
    pub date_added: DateTime<Utc>,
}

impl InventoryItem {
    /// Build a stored item from caller input, assigning a fresh id and `date_added = now`.
    pub fn new(input: NewInventoryItem) -> Self {
        Self {
            id: new_record_id(),
            name: input.name,
            sku: input.sku,
            stock: input.stock,
            min_stock: input.min_stock,
            price: input.price,
            date_added: Utc::now(),
        }
    }

    /// At-minimum counts as low.
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Value of the units on hand at the listed price.
    pub fn stock_value(&self) -> Amount {
        self.stock as Amount * self.price
    }

    /// Shallow-merge a patch. `id` and `date_added` are never touched.
    pub fn apply(&mut self, patch: InventoryItemPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(sku) = patch.sku {
            self.sku = sku;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(min_stock) = patch.min_stock {
            self.min_stock = min_stock;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
    }
}

/// Caller input for a new inventory item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    pub name: String,
    pub sku: String,
    pub stock: i64,
    pub min_stock: i64,
    pub price: Amount,
}

impl NewInventoryItem {
    pub fn new(name: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            ..Self::default()
        }
    }

    pub fn with_stock(mut self, stock: i64, min_stock: i64) -> Self {
        self.stock = stock;
        self.min_stock = min_stock;
        self
    }

    pub fn with_price(mut self, price: Amount) -> Self {
        self.price = price;
        self
    }
}

/// Partial update for an inventory item; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub stock: Option<i64>,
    pub min_stock: Option<i64>,
    pub price: Option<Amount>,
}

impl InventoryItemPatch {
    pub fn stock(stock: i64) -> Self {
        Self {
            stock: Some(stock),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sku.is_none()
            && self.stock.is_none()
            && self.min_stock.is_none()
            && self.price.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> InventoryItem {
        InventoryItem::new(
            NewInventoryItem::new("Widget", "W1")
                .with_stock(5, 10)
                .with_price(9.99),
        )
    }

    #[test]
    fn test_new_assigns_id_and_date() {
        let before = Utc::now();
        let item = widget();
        assert!(!item.id.is_empty());
        assert!(item.date_added >= before);
        assert_eq!(item.name, "Widget");
        assert_eq!(item.sku, "W1");
    }

    #[test]
    fn test_low_stock_boundary_is_inclusive() {
        let mut item = widget();
        assert!(item.is_low_stock());

        item.stock = 10;
        assert!(item.is_low_stock());

        item.stock = 11;
        assert!(!item.is_low_stock());
    }

    #[test]
    fn test_apply_patch_keeps_identity() {
        let mut item = widget();
        let id = item.id.clone();
        let added = item.date_added;

        item.apply(InventoryItemPatch {
            name: Some("Gadget".into()),
            price: Some(12.5),
            ..InventoryItemPatch::default()
        });

        assert_eq!(item.id, id);
        assert_eq!(item.date_added, added);
        assert_eq!(item.name, "Gadget");
        assert_eq!(item.sku, "W1");
        assert_eq!(item.stock, 5);
        assert_eq!(item.price, 12.5);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(widget()).unwrap();
        assert!(json.get("minStock").is_some());
        assert!(json.get("dateAdded").is_some());
        assert!(json.get("min_stock").is_none());
    }

    #[test]
    fn test_stock_value() {
        let item = widget();
        assert!((item.stock_value() - 49.95).abs() < 1e-9);
    }
}
