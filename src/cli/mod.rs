use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use crate::application::{LedgerStore, StoreConfig, DEFAULT_RECENT_LIMIT};
use crate::domain::{
    format_amount, parse_amount, Amount, EntryType, InventoryItemPatch, NewInventoryItem,
    NewLedgerEntry, NewSale, SettingsPatch, Transaction,
};
use crate::storage::SqliteBackend;

type Store = LedgerStore<SqliteBackend>;

/// BizLedger - Small Business Record Tracker
#[derive(Parser)]
#[command(name = "bizledger")]
#[command(about = "Track inventory, expenses and sales for a small business")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "bizledger.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Fail when updating or deleting an id that does not exist
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Inventory management commands
    #[command(subcommand)]
    Inventory(InventoryCommands),

    /// Expense and income commands
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Sales commands
    #[command(subcommand)]
    Sale(SaleCommands),

    /// Show revenue, expenses, profit and stock figures
    Dashboard {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// List the most recent sales and ledger entries
    Recent {
        /// Maximum number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show spending insights
    Insights,

    /// Settings commands
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Export data to JSON or CSV
    Export {
        /// What to export: full, inventory, expenses, sales
        #[arg(default_value = "full")]
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Replace all data with a previously exported JSON document
    Import {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Preview without importing
        #[arg(long)]
        dry_run: bool,
    },

    /// Permanently delete all data
    Clear {
        /// Confirm the irreversible reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum InventoryCommands {
    /// Add a new item
    Add {
        /// Item name
        name: String,

        /// Stock keeping unit
        #[arg(long, default_value = "")]
        sku: String,

        /// Units on hand
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        stock: i64,

        /// Low-stock threshold
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        min_stock: i64,

        /// Unit price (e.g., "9.99")
        #[arg(long, default_value = "0")]
        price: String,
    },

    /// List all items
    List,

    /// Update fields of an existing item
    Update {
        /// Item ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        sku: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        stock: Option<i64>,

        #[arg(long, allow_negative_numbers = true)]
        min_stock: Option<i64>,

        #[arg(long)]
        price: Option<String>,
    },

    /// Delete an item
    Delete {
        /// Item ID
        id: String,

        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// List items at or below their minimum stock
    LowStock,
}

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense or income entry
    Add {
        /// Amount (e.g., "20.00" or "20")
        amount: String,

        /// Entry type: expense, income
        #[arg(short = 't', long = "type", default_value = "expense")]
        entry_type: String,

        /// Category (e.g., "rent", "supplies")
        #[arg(short, long, default_value = "")]
        category: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Date of the entry (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// List entries
    List {
        /// Filter by type: expense, income
        #[arg(short = 't', long = "type")]
        entry_type: Option<String>,

        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Delete an entry
    Delete {
        /// Entry ID
        id: String,

        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Totals per category
    Categories {
        /// Entry type: expense, income
        #[arg(short = 't', long = "type", default_value = "expense")]
        entry_type: String,
    },
}

#[derive(Subcommand)]
pub enum SaleCommands {
    /// Record a sale
    Add {
        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Customer name (defaults to Walk-in)
        #[arg(short, long, default_value = "")]
        customer: String,

        /// Payment method (e.g., cash, card)
        #[arg(short, long, default_value = "cash")]
        payment: String,

        /// Items sold
        #[arg(short, long)]
        items: Option<String>,

        /// Date of the sale (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// List all sales
    List,

    /// Delete a sale
    Delete {
        /// Sale ID
        id: String,

        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show current settings
    Show,

    /// Set a single setting (currency, theme, language or any custom key)
    Set { key: String, value: String },
}

impl Cli {
    fn store_config(&self) -> StoreConfig {
        StoreConfig {
            strict: self.strict,
            ..StoreConfig::default()
        }
    }

    async fn open_store(&self) -> Result<Store> {
        let backend = SqliteBackend::init(&self.database).await?;
        Ok(LedgerStore::open_with_config(backend, self.store_config()).await?)
    }

    pub async fn run(self) -> Result<()> {
        let store = self.open_store().await?;

        match self.command {
            Commands::Init => {
                println!("Database initialized: {}", self.database);
            }

            Commands::Inventory(cmd) => run_inventory_command(&store, cmd).await?,

            Commands::Expense(cmd) => run_expense_command(&store, cmd).await?,

            Commands::Sale(cmd) => run_sale_command(&store, cmd).await?,

            Commands::Dashboard { format } => run_dashboard_command(&store, &format).await?,

            Commands::Recent { limit } => {
                let limit = limit.unwrap_or(store.config().recent_limit);
                run_recent_command(&store, limit).await?;
            }

            Commands::Insights => run_insights_command(&store).await?,

            Commands::Settings(cmd) => run_settings_command(&store, cmd).await?,

            Commands::Export {
                export_type,
                output,
            } => run_export_command(&store, &export_type, output.as_deref()).await?,

            Commands::Import { input, dry_run } => {
                run_import_command(&store, input.as_deref(), dry_run).await?
            }

            Commands::Clear { yes } => {
                confirm(yes, "clear all data")?;
                store.clear_all().await?;
                println!("All data cleared.");
            }
        }

        Ok(())
    }
}

async fn run_inventory_command(store: &Store, cmd: InventoryCommands) -> Result<()> {
    let currency = store.get_settings().await?.currency;

    match cmd {
        InventoryCommands::Add {
            name,
            sku,
            stock,
            min_stock,
            price,
        } => {
            let price = parse_amount(&price).context("Invalid price. Use '9.99' or '10'")?;
            let item = store
                .add_inventory_item(
                    NewInventoryItem::new(name, sku)
                        .with_stock(stock, min_stock)
                        .with_price(price),
                )
                .await?;
            println!("Added item: {} ({})", item.name, item.id);
        }

        InventoryCommands::List => {
            let items = store.get_inventory_items().await?;
            if items.is_empty() {
                println!("No inventory items.");
            } else {
                println!(
                    "{:<38} {:<20} {:<10} {:>7} {:>7} {:>10}",
                    "ID", "NAME", "SKU", "STOCK", "MIN", "PRICE"
                );
                println!("{}", "-".repeat(97));
                for item in items {
                    let flag = if item.is_low_stock() { " LOW" } else { "" };
                    println!(
                        "{:<38} {:<20} {:<10} {:>7} {:>7} {:>10}{}",
                        item.id,
                        truncate(&item.name, 20),
                        truncate(&item.sku, 10),
                        item.stock,
                        item.min_stock,
                        format_amount(item.price, &currency),
                        flag
                    );
                }
            }
        }

        InventoryCommands::Update {
            id,
            name,
            sku,
            stock,
            min_stock,
            price,
        } => {
            let price = price
                .map(|p| parse_amount(&p))
                .transpose()
                .context("Invalid price. Use '9.99' or '10'")?;
            let patch = InventoryItemPatch {
                name,
                sku,
                stock,
                min_stock,
                price,
            };
            if patch.is_empty() {
                anyhow::bail!(
                    "Nothing to update. Pass at least one of \
                     --name, --sku, --stock, --min-stock, --price"
                );
            }

            if store.update_inventory_item(&id, patch).await? {
                println!("Updated item: {}", id);
            } else {
                println!("No item with id {}", id);
            }
        }

        InventoryCommands::Delete { id, yes } => {
            confirm(yes, "delete this item")?;
            if store.delete_inventory_item(&id).await? {
                println!("Item deleted");
            } else {
                println!("No item with id {}", id);
            }
        }

        InventoryCommands::LowStock => {
            let items = store.low_stock_items().await?;
            if items.is_empty() {
                println!("No low stock items. Good inventory levels!");
            } else {
                for item in items {
                    println!("{}  Stock: {} (Min: {})", item.name, item.stock, item.min_stock);
                }
            }
        }
    }
    Ok(())
}

async fn run_expense_command(store: &Store, cmd: ExpenseCommands) -> Result<()> {
    let currency = store.get_settings().await?.currency;

    match cmd {
        ExpenseCommands::Add {
            amount,
            entry_type,
            category,
            description,
            date,
        } => {
            let amount = parse_amount(&amount).context("Invalid amount. Use '20.00' or '20'")?;
            let entry_type = parse_entry_type(&entry_type)?;

            let mut input = NewLedgerEntry::new(entry_type, amount)
                .with_category(category)
                .with_description(description);
            if let Some(date) = date {
                input = input.with_date(parse_date(&date)?);
            }

            let entry = store.add_expense(input).await?;
            println!(
                "Logged {}: {} ({})",
                entry.entry_type,
                format_amount(entry.amount, &currency),
                entry.id
            );
        }

        ExpenseCommands::List {
            entry_type,
            category,
        } => {
            let filter = entry_type.as_deref().map(parse_entry_type).transpose()?;
            let mut entries = store.get_expenses(filter).await?;
            if let Some(category) = category {
                entries.retain(|e| e.category == category);
            }

            if entries.is_empty() {
                println!("No entries found.");
            } else {
                println!(
                    "{:<12} {:<25} {:<15} {:>10} {:<8} ID",
                    "DATE", "DESCRIPTION", "CATEGORY", "AMOUNT", "TYPE"
                );
                println!("{}", "-".repeat(110));
                for entry in entries {
                    println!(
                        "{:<12} {:<25} {:<15} {:>10} {:<8} {}",
                        entry.date.format("%Y-%m-%d"),
                        truncate(&entry.description, 25),
                        truncate(&entry.category, 15),
                        format_amount(entry.amount, &currency),
                        entry.entry_type,
                        entry.id
                    );
                }
            }
        }

        ExpenseCommands::Delete { id, yes } => {
            confirm(yes, "delete this entry")?;
            if store.delete_expense(&id).await? {
                println!("Entry deleted");
            } else {
                println!("No entry with id {}", id);
            }
        }

        ExpenseCommands::Categories { entry_type } => {
            let entry_type = parse_entry_type(&entry_type)?;
            let totals = store.expense_totals_by_category(entry_type).await?;
            if totals.is_empty() {
                println!("No {} entries.", entry_type);
            } else {
                println!("{:<20} {:>12} {:>6} {:>7}", "CATEGORY", "TOTAL", "COUNT", "%");
                println!("{}", "-".repeat(48));
                for row in totals {
                    let name = if row.category.is_empty() {
                        "(none)"
                    } else {
                        row.category.as_str()
                    };
                    println!(
                        "{:<20} {:>12} {:>6} {:>6.1}%",
                        truncate(name, 20),
                        format_amount(row.total, &currency),
                        row.count,
                        row.percentage
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_sale_command(store: &Store, cmd: SaleCommands) -> Result<()> {
    let currency = store.get_settings().await?.currency;

    match cmd {
        SaleCommands::Add {
            amount,
            customer,
            payment,
            items,
            date,
        } => {
            let amount = parse_amount(&amount).context("Invalid amount. Use '50.00' or '50'")?;

            let mut input = NewSale::new(customer, amount).with_payment_method(payment);
            if let Some(items) = items {
                input = input.with_items(items);
            }
            if let Some(date) = date {
                input = input.with_date(parse_date(&date)?);
            }

            let sale = store.add_sale(input).await?;
            println!(
                "Recorded sale: {} from {} ({})",
                format_amount(sale.amount, &currency),
                sale.customer,
                sale.id
            );
        }

        SaleCommands::List => {
            let sales = store.get_sales().await?;
            if sales.is_empty() {
                println!("No sales recorded.");
            } else {
                println!(
                    "{:<12} {:<20} {:>10} {:<10} {:<20} ID",
                    "DATE", "CUSTOMER", "AMOUNT", "PAYMENT", "ITEMS"
                );
                println!("{}", "-".repeat(110));
                for sale in sales {
                    println!(
                        "{:<12} {:<20} {:>10} {:<10} {:<20} {}",
                        sale.date.format("%Y-%m-%d"),
                        truncate(&sale.customer, 20),
                        format_amount(sale.amount, &currency),
                        truncate(&sale.payment_method, 10),
                        truncate(sale.items.as_deref().unwrap_or("-"), 20),
                        sale.id
                    );
                }
            }
        }

        SaleCommands::Delete { id, yes } => {
            confirm(yes, "delete this sale")?;
            if store.delete_sale(&id).await? {
                println!("Sale deleted");
            } else {
                println!("No sale with id {}", id);
            }
        }
    }
    Ok(())
}

async fn run_dashboard_command(store: &Store, format: &str) -> Result<()> {
    let summary = store.dashboard_summary().await?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "table" => {
            let currency = store.get_settings().await?.currency;
            println!("Dashboard");
            println!("{}", "=".repeat(40));
            println!(
                "  Revenue:         {:>15}",
                format_amount(summary.total_revenue, &currency)
            );
            println!(
                "  Other income:    {:>15}",
                format_amount(summary.total_income, &currency)
            );
            println!(
                "  Expenses:        {:>15}",
                format_amount(summary.total_expenses, &currency)
            );
            println!("{}", "-".repeat(40));
            println!(
                "  Net profit:      {:>15}",
                format_amount(summary.net_profit, &currency)
            );
            println!();
            println!("  Items:           {:>15}", summary.item_count);
            println!("  Low stock:       {:>15}", summary.low_stock_count);
            println!(
                "  Stock value:     {:>15}",
                format_amount(summary.inventory_value, &currency)
            );
            if let Some(saved) = store.backend().last_modified().await? {
                println!("  Last saved:      {:>15}", short_timestamp(&saved));
            }
            println!();
            run_recent_command(store, DEFAULT_RECENT_LIMIT).await?;
        }
        _ => anyhow::bail!("Invalid format '{}'. Valid formats: table, json", format),
    }
    Ok(())
}

async fn run_recent_command(store: &Store, limit: usize) -> Result<()> {
    let currency = store.get_settings().await?.currency;
    let transactions = store.recent_transactions(limit).await?;

    if transactions.is_empty() {
        println!("No transactions yet. Start adding data!");
        return Ok(());
    }

    println!(
        "{:<38} {:<12} {:<8} {:>12} DETAIL",
        "ID", "DATE", "KIND", "AMOUNT"
    );
    println!("{}", "-".repeat(98));
    for t in &transactions {
        let detail = match t {
            Transaction::Sale(s) => s.customer.as_str(),
            Transaction::Entry(e) if !e.description.is_empty() => e.description.as_str(),
            Transaction::Entry(e) => e.category.as_str(),
        };
        println!(
            "{:<38} {:<12} {:<8} {:>12} {}",
            t.id(),
            t.date().format("%Y-%m-%d"),
            t.label(),
            format_amount(t.amount(), &currency),
            truncate(detail, 30)
        );
    }

    let net: Amount = transactions.iter().map(Transaction::signed_amount).sum();
    println!("{}", "-".repeat(98));
    println!(
        "Net over these {}: {}",
        transactions.len(),
        format_amount(net, &currency)
    );
    Ok(())
}

async fn run_insights_command(store: &Store) -> Result<()> {
    let insights = store.spending_insights().await?;
    if insights.entry_count == 0 {
        println!("No spending data yet. Add expenses to see insights.");
        return Ok(());
    }

    let currency = store.get_settings().await?.currency;
    println!(
        "Total spending: {}",
        format_amount(insights.total_spending, &currency)
    );
    println!("Entries:        {}", insights.entry_count);
    Ok(())
}

async fn run_settings_command(store: &Store, cmd: SettingsCommands) -> Result<()> {
    match cmd {
        SettingsCommands::Show => {
            let settings = store.get_settings().await?;
            println!("currency = {}", settings.currency);
            println!("theme    = {}", settings.theme);
            println!("language = {}", settings.language);
            for key in settings.extra.keys() {
                if let Some(value) = settings.get(key) {
                    println!("{} = {}", key, value);
                }
            }
        }
        SettingsCommands::Set { key, value } => {
            let patch = SettingsPatch::from_pair(&key, &value).map_err(|e| anyhow::anyhow!(e))?;
            let settings = store.update_settings(patch).await?;
            println!(
                "{} = {}",
                key,
                settings.get(&key).unwrap_or_default()
            );
        }
    }
    Ok(())
}

async fn run_export_command(store: &Store, export_type: &str, output: Option<&str>) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(store);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = match export_type {
        "full" => exporter.export_full_json(writer).await?,
        "inventory" => exporter.export_inventory_csv(writer).await?,
        "expenses" => exporter.export_expenses_csv(writer).await?,
        "sales" => exporter.export_sales_csv(writer).await?,
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: full, inventory, expenses, sales",
                export_type
            );
        }
    };

    if output.is_some() {
        if export_type == "full" {
            eprintln!("Exported full document ({} bytes)", count);
        } else {
            eprintln!("Exported {} {} records", count, export_type);
        }
    }

    Ok(())
}

async fn run_import_command(store: &Store, input: Option<&str>, dry_run: bool) -> Result<()> {
    use crate::io::{ImportOptions, Importer};
    use std::fs::File;
    use std::io::{stdin, Read};

    let importer = Importer::new(store);

    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let result = importer
        .import_json(reader, ImportOptions { dry_run })
        .await?;

    if dry_run {
        println!(
            "Dry run: would import {} items, {} entries, {} sales",
            result.inventory, result.expenses, result.sales
        );
    } else if result.applied {
        println!(
            "Imported {} items, {} entries, {} sales",
            result.inventory, result.expenses, result.sales
        );
    } else {
        anyhow::bail!(
            "Import failed: input is not a valid export. Existing data was left unchanged."
        );
    }

    Ok(())
}

fn confirm(yes: bool, action: &str) -> Result<()> {
    if !yes {
        anyhow::bail!("Refusing to {} without --yes", action);
    }
    Ok(())
}

fn parse_entry_type(s: &str) -> Result<EntryType> {
    s.parse::<EntryType>()
        .map_err(|e| anyhow::anyhow!("{}. Valid types: expense, income", e))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// RFC 3339 timestamp as "YYYY-MM-DD HH:MM"; anything unparsable is shown as is.
fn short_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    use chrono::NaiveDate;

    // Parse YYYY-MM-DD format
    let naive_date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD", date_str))?;

    let naive_datetime = naive_date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid date"))?;

    Ok(DateTime::from_naive_utc_and_offset(naive_datetime, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long description", 10), "a very ...");
        assert_eq!(truncate("caffè latte grande", 8), "caffè...");
    }

    #[test]
    fn test_short_timestamp() {
        assert_eq!(
            short_timestamp("2024-02-01T09:30:15.123+00:00"),
            "2024-02-01 09:30"
        );
        assert_eq!(short_timestamp("2024-02-01T10:30:00+01:00"), "2024-02-01 09:30");
        assert_eq!(short_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-01-15").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-01-15T00:00:00+00:00");
        assert!(parse_date("15/01/2024").is_err());
    }

    #[test]
    fn test_confirm_requires_yes() {
        assert!(confirm(false, "clear all data").is_err());
        assert!(confirm(true, "clear all data").is_ok());
    }

    #[test]
    fn test_cli_parses_sale_add() {
        let cli = Cli::try_parse_from([
            "bizledger", "sale", "add", "50", "--payment", "card", "--items", "2x Widget",
        ])
        .unwrap();
        assert_eq!(cli.database, "bizledger.db");
        match cli.command {
            Commands::Sale(SaleCommands::Add {
                amount,
                customer,
                payment,
                items,
                ..
            }) => {
                assert_eq!(amount, "50");
                assert_eq!(customer, "");
                assert_eq!(payment, "card");
                assert_eq!(items.as_deref(), Some("2x Widget"));
            }
            _ => panic!("expected sale add"),
        }
    }

    #[test]
    fn test_cli_parses_negative_stock() {
        let cli = Cli::try_parse_from([
            "bizledger", "inventory", "update", "abc", "--stock", "-3",
        ])
        .unwrap();
        match cli.command {
            Commands::Inventory(InventoryCommands::Update { id, stock, .. }) => {
                assert_eq!(id, "abc");
                assert_eq!(stock, Some(-3));
            }
            _ => panic!("expected inventory update"),
        }
    }
}
