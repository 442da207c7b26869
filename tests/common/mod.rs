// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use bizledger::application::LedgerStore;
use bizledger::domain::{NewInventoryItem, NewLedgerEntry, NewSale};
use bizledger::storage::{MemoryBackend, SqliteBackend};
use chrono::{DateTime, NaiveDate, Utc};
use tempfile::TempDir;

/// Helper to create a store over an in-memory backend
pub async fn memory_store() -> Result<(LedgerStore<MemoryBackend>, MemoryBackend)> {
    let backend = MemoryBackend::new();
    let store = LedgerStore::open(backend.clone()).await?;
    Ok((store, backend))
}

/// Helper to create a store with a temporary SQLite database
pub async fn sqlite_store() -> Result<(LedgerStore<SqliteBackend>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store = open_sqlite(&temp_dir).await?;
    Ok((store, temp_dir))
}

/// Open (or reopen) the store living in `temp_dir`
pub async fn open_sqlite(temp_dir: &TempDir) -> Result<LedgerStore<SqliteBackend>> {
    let backend = SqliteBackend::init(temp_dir.path().join("test.db")).await?;
    Ok(LedgerStore::open(backend).await?)
}

/// Helper to parse a date string into DateTime<Utc>
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// Test fixture: a small shop with a bit of everything
pub struct SampleShop;

impl SampleShop {
    /// Two items (one low on stock), two sales, one expense and one income entry
    pub async fn populate<B: bizledger::DocumentBackend>(store: &LedgerStore<B>) -> Result<()> {
        store
            .add_inventory_item(
                NewInventoryItem::new("Widget", "W1")
                    .with_stock(5, 10)
                    .with_price(9.99),
            )
            .await?;
        store
            .add_inventory_item(
                NewInventoryItem::new("Gadget", "G1")
                    .with_stock(40, 10)
                    .with_price(24.5),
            )
            .await?;
        store
            .add_sale(
                NewSale::new("Acme Ltd", 120.0)
                    .with_payment_method("card")
                    .with_date(parse_date("2024-02-01")),
            )
            .await?;
        store
            .add_sale(
                NewSale::new("", 30.0)
                    .with_payment_method("cash")
                    .with_date(parse_date("2024-02-03")),
            )
            .await?;
        store
            .add_expense(
                NewLedgerEntry::expense(45.0)
                    .with_category("supplies")
                    .with_description("Packaging")
                    .with_date(parse_date("2024-02-02")),
            )
            .await?;
        store
            .add_expense(
                NewLedgerEntry::income(10.0)
                    .with_category("refunds")
                    .with_date(parse_date("2024-02-04")),
            )
            .await?;
        Ok(())
    }
}
