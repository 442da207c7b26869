use anyhow::{Context, Result};
use std::io::Read;

use crate::application::LedgerStore;
use crate::storage::DocumentBackend;

/// Result of an import operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub applied: bool,
    pub inventory: usize,
    pub expenses: usize,
    pub sales: usize,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Parse and count, but leave the stored document alone
    pub dry_run: bool,
}

/// Importer for replacing the store contents with an exported document
pub struct Importer<'a, B: DocumentBackend> {
    store: &'a LedgerStore<B>,
}

impl<'a, B: DocumentBackend> Importer<'a, B> {
    pub fn new(store: &'a LedgerStore<B>) -> Self {
        Self { store }
    }

    /// Import a full JSON document.
    ///
    /// A blob that is not a valid document yields `applied: false` and zero
    /// counts; the stored document is unchanged.
    pub async fn import_json<R: Read>(
        &self,
        mut reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let mut blob = String::new();
        reader
            .read_to_string(&mut blob)
            .context("Failed to read import data")?;

        let Ok(doc) = LedgerStore::<B>::parse_document(&blob) else {
            return Ok(ImportResult {
                applied: false,
                inventory: 0,
                expenses: 0,
                sales: 0,
            });
        };

        let applied = if options.dry_run {
            false
        } else {
            self.store.import_document(&blob).await?
        };

        Ok(ImportResult {
            applied,
            inventory: doc.inventory.len(),
            expenses: doc.expenses.len(),
            sales: doc.sales.len(),
        })
    }
}
