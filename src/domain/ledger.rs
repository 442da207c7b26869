//! Pure aggregate computations over the record collections.
//!
//! Nothing here is cached: callers pass the current collections and get a fresh
//! answer, so results always reflect the latest writes.

use std::collections::BTreeMap;

use super::{Amount, EntryType, InventoryItem, LedgerEntry, SaleRecord, Transaction};

/// Sum of all sale amounts.
pub fn total_revenue(sales: &[SaleRecord]) -> Amount {
    sales.iter().map(|s| s.amount).sum()
}

/// Sum of ledger entry amounts of the given type.
pub fn total_by_type(entries: &[LedgerEntry], entry_type: EntryType) -> Amount {
    entries
        .iter()
        .filter(|e| e.entry_type == entry_type)
        .map(|e| e.amount)
        .sum()
}

/// revenue + income - expenses
pub fn net_profit(sales: &[SaleRecord], entries: &[LedgerEntry]) -> Amount {
    total_revenue(sales) + total_by_type(entries, EntryType::Income)
        - total_by_type(entries, EntryType::Expense)
}

/// Items at or below their minimum stock level, in storage order.
pub fn low_stock(items: &[InventoryItem]) -> Vec<InventoryItem> {
    items.iter().filter(|i| i.is_low_stock()).cloned().collect()
}

/// Total value of stock on hand.
pub fn inventory_value(items: &[InventoryItem]) -> Amount {
    items.iter().map(InventoryItem::stock_value).sum()
}

/// Merge sales and ledger entries, newest first, keeping at most `limit`.
///
/// The sort is stable over the concatenation `sales ++ entries`, so records
/// sharing a timestamp keep that relative order.
pub fn recent_transactions(
    sales: &[SaleRecord],
    entries: &[LedgerEntry],
    limit: usize,
) -> Vec<Transaction> {
    let mut all: Vec<Transaction> = sales
        .iter()
        .cloned()
        .map(Transaction::from)
        .chain(entries.iter().cloned().map(Transaction::from))
        .collect();

    all.sort_by(|a, b| b.date().cmp(&a.date()));
    all.truncate(limit);
    all
}

/// Per-category totals for one entry type, keyed and ordered by category name.
pub fn totals_by_category(
    entries: &[LedgerEntry],
    entry_type: EntryType,
) -> BTreeMap<String, (Amount, usize)> {
    let mut totals: BTreeMap<String, (Amount, usize)> = BTreeMap::new();

    for entry in entries.iter().filter(|e| e.entry_type == entry_type) {
        let slot = totals.entry(entry.category.clone()).or_insert((0.0, 0));
        slot.0 += entry.amount;
        slot.1 += 1;
    }

    totals
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};

    use super::*;
    use crate::domain::{NewInventoryItem, NewLedgerEntry, NewSale};

    fn at(offset_days: i64) -> DateTime<Utc> {
        "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap() + Duration::days(offset_days)
    }

    fn sale(amount: Amount, day: i64) -> SaleRecord {
        SaleRecord::new(NewSale::new("", amount).with_date(at(day)))
    }

    fn entry(entry_type: EntryType, amount: Amount, day: i64) -> LedgerEntry {
        LedgerEntry::new(NewLedgerEntry::new(entry_type, amount).with_date(at(day)))
    }

    #[test]
    fn test_totals_on_empty_collections() {
        assert_eq!(total_revenue(&[]), 0.0);
        assert_eq!(total_by_type(&[], EntryType::Expense), 0.0);
        assert_eq!(net_profit(&[], &[]), 0.0);
        assert!(recent_transactions(&[], &[], 10).is_empty());
    }

    #[test]
    fn test_net_profit_identity() {
        let sales = vec![sale(50.0, 0), sale(25.0, 1)];
        let entries = vec![
            entry(EntryType::Expense, 20.0, 0),
            entry(EntryType::Income, 100.0, 1),
            entry(EntryType::Expense, 5.0, 2),
        ];

        let expected = total_revenue(&sales) + total_by_type(&entries, EntryType::Income)
            - total_by_type(&entries, EntryType::Expense);
        assert_eq!(net_profit(&sales, &entries), expected);
        assert_eq!(net_profit(&sales, &entries), 150.0);
    }

    #[test]
    fn test_low_stock_filters_inclusively() {
        let items: Vec<InventoryItem> = [(5, 10), (10, 10), (11, 10), (0, 0)]
            .into_iter()
            .map(|(stock, min)| {
                InventoryItem::new(NewInventoryItem::new("x", "x").with_stock(stock, min))
            })
            .collect();

        let low = low_stock(&items);
        let stocks: Vec<i64> = low.iter().map(|i| i.stock).collect();
        assert_eq!(stocks, vec![5, 10, 0]);
    }

    #[test]
    fn test_recent_transactions_newest_first() {
        let sales = vec![sale(1.0, 1), sale(2.0, 5), sale(3.0, 3)];
        let entries = vec![
            entry(EntryType::Expense, 4.0, 4),
            entry(EntryType::Income, 5.0, 2),
        ];

        let recent = recent_transactions(&sales, &entries, 3);
        let amounts: Vec<Amount> = recent.iter().map(Transaction::amount).collect();
        assert_eq!(amounts, vec![2.0, 4.0, 3.0]);
    }

    #[test]
    fn test_recent_transactions_tie_keeps_sales_first() {
        let sales = vec![sale(1.0, 0)];
        let entries = vec![entry(EntryType::Expense, 2.0, 0)];

        let recent = recent_transactions(&sales, &entries, 10);
        assert_eq!(recent[0].label(), "Sale");
        assert_eq!(recent[1].label(), "Expense");
    }

    #[test]
    fn test_totals_by_category() {
        let mut rent = entry(EntryType::Expense, 500.0, 0);
        rent.category = "rent".into();
        let mut supplies = entry(EntryType::Expense, 20.0, 1);
        supplies.category = "supplies".into();
        let mut more_supplies = entry(EntryType::Expense, 30.0, 2);
        more_supplies.category = "supplies".into();
        let mut grant = entry(EntryType::Income, 1000.0, 3);
        grant.category = "grants".into();

        let totals = totals_by_category(
            &[rent, supplies, more_supplies, grant],
            EntryType::Expense,
        );
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["rent"], (500.0, 1));
        assert_eq!(totals["supplies"], (50.0, 2));
    }
}
