use anyhow::Result;
use std::io::Write;

use crate::application::LedgerStore;
use crate::storage::DocumentBackend;

/// Exporter for writing store contents to files or pipes.
pub struct Exporter<'a, B: DocumentBackend> {
    store: &'a LedgerStore<B>,
}

impl<'a, B: DocumentBackend> Exporter<'a, B> {
    pub fn new(store: &'a LedgerStore<B>) -> Self {
        Self { store }
    }

    /// Export inventory items to CSV format
    pub async fn export_inventory_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let items = self.store.get_inventory_items().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "name",
            "sku",
            "stock",
            "min_stock",
            "price",
            "date_added",
        ])?;

        for item in &items {
            csv_writer.write_record(&[
                item.id.clone(),
                item.name.clone(),
                item.sku.clone(),
                item.stock.to_string(),
                item.min_stock.to_string(),
                item.price.to_string(),
                item.date_added.to_rfc3339(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(items.len())
    }

    /// Export expense and income entries to CSV format
    pub async fn export_expenses_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let entries = self.store.get_expenses(None).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "date", "type", "category", "description", "amount"])?;

        for entry in &entries {
            csv_writer.write_record(&[
                entry.id.clone(),
                entry.date.to_rfc3339(),
                entry.entry_type.as_str().to_string(),
                entry.category.clone(),
                entry.description.clone(),
                entry.amount.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(entries.len())
    }

    /// Export sales to CSV format
    pub async fn export_sales_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let sales = self.store.get_sales().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "date", "customer", "amount", "payment_method", "items"])?;

        for sale in &sales {
            csv_writer.write_record(&[
                sale.id.clone(),
                sale.date.to_rfc3339(),
                sale.customer.clone(),
                sale.amount.to_string(),
                sale.payment_method.clone(),
                sale.items.clone().unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(sales.len())
    }

    /// Export the whole document as pretty-printed JSON
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let json = self.store.export_document().await?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(json.len())
    }
}
