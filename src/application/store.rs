use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{
    self, Amount, Document, EntryType, InventoryItem, InventoryItemPatch, LedgerEntry,
    NewInventoryItem, NewLedgerEntry, NewSale, SaleRecord, Settings, SettingsPatch, Transaction,
};
use crate::storage::DocumentBackend;

use super::{CategoryTotal, Collection, DashboardSummary, SpendingInsights, StoreError, StoreResult};

/// Default number of rows in the recent-activity feed.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Report updates/deletes of unknown ids as `StoreError::NotFound`
    /// instead of returning `Ok(false)`.
    pub strict: bool,
    pub recent_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            strict: false,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

/// Owner of the persisted document and the only way to read or change it.
///
/// Every mutation is a full read-modify-write of the document. Mutations from
/// the same store instance are serialized; separate processes sharing a backend
/// are not coordinated and the last writer wins.
///
/// There is no change notification: front-ends re-query after they mutate.
pub struct LedgerStore<B: DocumentBackend> {
    backend: B,
    config: StoreConfig,
    write_lock: Mutex<()>,
}

impl<B: DocumentBackend> LedgerStore<B> {
    /// Open a store over `backend`, writing the default document if the slot is empty.
    pub async fn open(backend: B) -> StoreResult<Self> {
        Self::open_with_config(backend, StoreConfig::default()).await
    }

    pub async fn open_with_config(backend: B, config: StoreConfig) -> StoreResult<Self> {
        let store = Self {
            backend,
            config,
            write_lock: Mutex::new(()),
        };
        store.initialize().await?;
        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Write the default document if none exists. Returns `true` if it did.
    /// Safe to call any number of times.
    pub async fn initialize(&self) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        if self.backend.read().await?.is_some() {
            return Ok(false);
        }

        info!("No stored document found, writing defaults");
        self.persist(&Document::default()).await?;
        Ok(true)
    }

    // ========================
    // Document primitives
    // ========================

    /// Read and deserialize the stored document.
    ///
    /// An empty slot reads as the default document. A blob that does not parse is
    /// reported as `StoreError::CorruptState`.
    pub async fn load_document(&self) -> StoreResult<Document> {
        match self.backend.read().await? {
            Some(blob) => Document::from_json(&blob).map_err(StoreError::CorruptState),
            None => Ok(Document::default()),
        }
    }

    /// Replace the stored document wholesale.
    pub async fn save_document(&self, doc: &Document) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        self.persist(doc).await
    }

    /// The document every read works from. Corrupt state degrades to the
    /// defaults so the application stays usable; mutations refuse to run
    /// against it instead (see `mutate`).
    async fn document(&self) -> StoreResult<Document> {
        match self.load_document().await {
            Err(StoreError::CorruptState(err)) => {
                warn!(error = %err, "Stored document is corrupt, falling back to defaults");
                Ok(Document::default())
            }
            other => other,
        }
    }

    async fn persist(&self, doc: &Document) -> StoreResult<()> {
        let blob = doc.to_json().map_err(StoreError::Serialization)?;
        self.backend.write(&blob).await?;
        Ok(())
    }

    /// Run `f` against the current document and persist the result if `f`
    /// reports a change.
    ///
    /// An unreadable stored blob fails with `CorruptState` and is left in place;
    /// only `import_document`, `save_document` or `clear_all` replace it.
    async fn mutate<T>(&self, f: impl FnOnce(&mut Document) -> (T, bool)) -> StoreResult<T> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load_document().await?;
        let (out, changed) = f(&mut doc);
        if changed {
            self.persist(&doc).await?;
        }
        Ok(out)
    }

    fn missing(&self, collection: Collection, id: &str) -> StoreResult<bool> {
        if self.config.strict {
            return Err(StoreError::NotFound {
                collection,
                id: id.to_string(),
            });
        }
        debug!(%collection, id, "No record with this id, nothing to do");
        Ok(false)
    }

    async fn delete_record(&self, collection: Collection, id: &str) -> StoreResult<bool> {
        let removed = self
            .mutate(|doc| {
                let removed = match collection {
                    Collection::Inventory => remove_by_id(&mut doc.inventory, id, |r| &r.id),
                    Collection::Expenses => remove_by_id(&mut doc.expenses, id, |r| &r.id),
                    Collection::Sales => remove_by_id(&mut doc.sales, id, |r| &r.id),
                };
                (removed, removed)
            })
            .await?;

        if !removed {
            return self.missing(collection, id);
        }
        debug!(%collection, id, "Deleted record");
        Ok(true)
    }

    // ========================
    // Inventory
    // ========================

    pub async fn add_inventory_item(&self, input: NewInventoryItem) -> StoreResult<InventoryItem> {
        let item = InventoryItem::new(input);
        let stored = item.clone();
        self.mutate(move |doc| {
            doc.inventory.push(item);
            ((), true)
        })
        .await?;

        debug!(id = %stored.id, sku = %stored.sku, "Added inventory item");
        Ok(stored)
    }

    /// All items in insertion order.
    pub async fn get_inventory_items(&self) -> StoreResult<Vec<InventoryItem>> {
        Ok(self.document().await?.inventory)
    }

    pub async fn get_inventory_item(&self, id: &str) -> StoreResult<Option<InventoryItem>> {
        Ok(self
            .document()
            .await?
            .inventory
            .into_iter()
            .find(|i| i.id == id))
    }

    /// Shallow-merge `patch` into the item with this id. `Ok(false)` if there is none.
    pub async fn update_inventory_item(
        &self,
        id: &str,
        patch: InventoryItemPatch,
    ) -> StoreResult<bool> {
        let updated = self
            .mutate(|doc| match doc.inventory.iter_mut().find(|i| i.id == id) {
                Some(item) => {
                    item.apply(patch);
                    (true, true)
                }
                None => (false, false),
            })
            .await?;

        if !updated {
            return self.missing(Collection::Inventory, id);
        }
        debug!(id, "Updated inventory item");
        Ok(true)
    }

    pub async fn delete_inventory_item(&self, id: &str) -> StoreResult<bool> {
        self.delete_record(Collection::Inventory, id).await
    }

    // ========================
    // Expenses and income
    // ========================

    pub async fn add_expense(&self, input: NewLedgerEntry) -> StoreResult<LedgerEntry> {
        let entry = LedgerEntry::new(input);
        let stored = entry.clone();
        self.mutate(move |doc| {
            doc.expenses.push(entry);
            ((), true)
        })
        .await?;

        debug!(id = %stored.id, entry_type = %stored.entry_type, "Added ledger entry");
        Ok(stored)
    }

    /// Ledger entries in insertion order, optionally only those of one type.
    pub async fn get_expenses(&self, filter: Option<EntryType>) -> StoreResult<Vec<LedgerEntry>> {
        let mut entries = self.document().await?.expenses;
        if let Some(entry_type) = filter {
            entries.retain(|e| e.entry_type == entry_type);
        }
        Ok(entries)
    }

    pub async fn get_expenses_by_category(&self, category: &str) -> StoreResult<Vec<LedgerEntry>> {
        let mut entries = self.document().await?.expenses;
        entries.retain(|e| e.category == category);
        Ok(entries)
    }

    pub async fn delete_expense(&self, id: &str) -> StoreResult<bool> {
        self.delete_record(Collection::Expenses, id).await
    }

    // ========================
    // Sales
    // ========================

    pub async fn add_sale(&self, input: NewSale) -> StoreResult<SaleRecord> {
        let sale = SaleRecord::new(input);
        let stored = sale.clone();
        self.mutate(move |doc| {
            doc.sales.push(sale);
            ((), true)
        })
        .await?;

        debug!(id = %stored.id, customer = %stored.customer, "Added sale");
        Ok(stored)
    }

    pub async fn get_sales(&self) -> StoreResult<Vec<SaleRecord>> {
        Ok(self.document().await?.sales)
    }

    pub async fn delete_sale(&self, id: &str) -> StoreResult<bool> {
        self.delete_record(Collection::Sales, id).await
    }

    // ========================
    // Analytics
    // ========================

    pub async fn total_revenue(&self) -> StoreResult<Amount> {
        Ok(domain::total_revenue(&self.document().await?.sales))
    }

    pub async fn total_expenses(&self) -> StoreResult<Amount> {
        Ok(domain::total_by_type(
            &self.document().await?.expenses,
            EntryType::Expense,
        ))
    }

    pub async fn total_income(&self) -> StoreResult<Amount> {
        Ok(domain::total_by_type(
            &self.document().await?.expenses,
            EntryType::Income,
        ))
    }

    /// Revenue plus income minus expenses.
    pub async fn net_profit(&self) -> StoreResult<Amount> {
        let doc = self.document().await?;
        Ok(domain::net_profit(&doc.sales, &doc.expenses))
    }

    /// Items whose stock is at or below their minimum.
    pub async fn low_stock_items(&self) -> StoreResult<Vec<InventoryItem>> {
        Ok(domain::low_stock(&self.document().await?.inventory))
    }

    /// Sales and ledger entries merged, newest first, at most `limit` of them.
    pub async fn recent_transactions(&self, limit: usize) -> StoreResult<Vec<Transaction>> {
        let doc = self.document().await?;
        Ok(domain::recent_transactions(&doc.sales, &doc.expenses, limit))
    }

    pub async fn inventory_value(&self) -> StoreResult<Amount> {
        Ok(domain::inventory_value(&self.document().await?.inventory))
    }

    pub async fn dashboard_summary(&self) -> StoreResult<DashboardSummary> {
        let doc = self.document().await?;
        let total_revenue = domain::total_revenue(&doc.sales);
        let total_expenses = domain::total_by_type(&doc.expenses, EntryType::Expense);
        let total_income = domain::total_by_type(&doc.expenses, EntryType::Income);

        Ok(DashboardSummary {
            total_revenue,
            total_expenses,
            total_income,
            net_profit: total_revenue + total_income - total_expenses,
            item_count: doc.inventory.len(),
            low_stock_count: doc.inventory.iter().filter(|i| i.is_low_stock()).count(),
            inventory_value: domain::inventory_value(&doc.inventory),
        })
    }

    pub async fn spending_insights(&self) -> StoreResult<SpendingInsights> {
        let entries = self.document().await?.expenses;
        Ok(SpendingInsights {
            total_spending: domain::total_by_type(&entries, EntryType::Expense),
            entry_count: entries.len(),
        })
    }

    /// Per-category totals for one entry type, sorted by category name.
    pub async fn expense_totals_by_category(
        &self,
        entry_type: EntryType,
    ) -> StoreResult<Vec<CategoryTotal>> {
        let entries = self.document().await?.expenses;
        let totals = domain::totals_by_category(&entries, entry_type);
        let grand_total: Amount = totals.values().map(|(total, _)| total).sum();

        Ok(totals
            .into_iter()
            .map(|(category, (total, count))| CategoryTotal {
                category,
                total,
                count,
                percentage: if grand_total != 0.0 {
                    total / grand_total * 100.0
                } else {
                    0.0
                },
            })
            .collect())
    }

    // ========================
    // Settings
    // ========================

    pub async fn get_settings(&self) -> StoreResult<Settings> {
        Ok(self.document().await?.settings)
    }

    /// Merge `patch` into the stored settings; keys not in the patch are kept.
    pub async fn update_settings(&self, patch: SettingsPatch) -> StoreResult<Settings> {
        let settings = self
            .mutate(|doc| {
                doc.settings.merge(patch);
                (doc.settings.clone(), true)
            })
            .await?;
        debug!("Updated settings");
        Ok(settings)
    }

    // ========================
    // Export / import / reset
    // ========================

    /// Full pretty-printed JSON dump of the current document.
    pub async fn export_document(&self) -> StoreResult<String> {
        self.document()
            .await?
            .to_json_pretty()
            .map_err(StoreError::Serialization)
    }

    /// Parse an import blob without applying it.
    pub fn parse_document(blob: &str) -> StoreResult<Document> {
        Document::from_json(blob).map_err(StoreError::ImportParse)
    }

    /// Replace the stored document with `blob`.
    ///
    /// Returns `Ok(false)` if the blob is not a valid document; the stored
    /// document is left untouched in that case.
    pub async fn import_document(&self, blob: &str) -> StoreResult<bool> {
        let doc = match Self::parse_document(blob) {
            Ok(doc) => doc,
            Err(err) => {
                warn!(error = %err, "Import failed");
                return Ok(false);
            }
        };

        self.save_document(&doc).await?;
        info!(
            inventory = doc.inventory.len(),
            expenses = doc.expenses.len(),
            sales = doc.sales.len(),
            "Imported document"
        );
        Ok(true)
    }

    /// Erase everything and start over with the default document.
    ///
    /// Irreversible and unconditional; asking the user first is the caller's job.
    /// The reset is a single write, so a failed clear leaves the old document intact.
    pub async fn clear_all(&self) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        self.persist(&Document::default()).await?;
        info!("Cleared all data");
        Ok(())
    }
}

fn remove_by_id<T>(records: &mut Vec<T>, id: &str, id_of: impl Fn(&T) -> &String) -> bool {
    let before = records.len();
    records.retain(|r| id_of(r) != id);
    records.len() != before
}
