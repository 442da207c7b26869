mod common;

use anyhow::Result;
use bizledger::domain::{EntryType, NewLedgerEntry, NewSale, Transaction, WALK_IN_CUSTOMER};
use common::{memory_store, parse_date, SampleShop};

#[tokio::test]
async fn test_sale_without_customer_is_walk_in() -> Result<()> {
    let (store, _backend) = memory_store().await?;

    let sale = store.add_sale(NewSale::new("", 50.0)).await?;
    assert_eq!(sale.customer, WALK_IN_CUSTOMER);

    let sales = store.get_sales().await?;
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].customer, "Walk-in");
    assert_eq!(sales[0].amount, 50.0);
    Ok(())
}

#[tokio::test]
async fn test_expense_and_income_totals() -> Result<()> {
    let (store, _backend) = memory_store().await?;

    store.add_expense(NewLedgerEntry::expense(20.0)).await?;
    store.add_expense(NewLedgerEntry::income(100.0)).await?;

    assert_eq!(store.total_expenses().await?, 20.0);
    assert_eq!(store.total_income().await?, 100.0);
    assert_eq!(
        store.net_profit().await?,
        store.total_revenue().await? + 80.0
    );
    Ok(())
}

#[tokio::test]
async fn test_net_profit_identity_on_mixed_data() -> Result<()> {
    let (store, _backend) = memory_store().await?;
    SampleShop::populate(&store).await?;

    let revenue = store.total_revenue().await?;
    let income = store.total_income().await?;
    let expenses = store.total_expenses().await?;

    assert_eq!(revenue, 150.0);
    assert_eq!(income, 10.0);
    assert_eq!(expenses, 45.0);
    assert_eq!(store.net_profit().await?, revenue + income - expenses);
    Ok(())
}

#[tokio::test]
async fn test_entry_date_defaults_to_now() -> Result<()> {
    let (store, _backend) = memory_store().await?;
    let before = chrono::Utc::now();

    let entry = store.add_expense(NewLedgerEntry::expense(1.0)).await?;
    let sale = store.add_sale(NewSale::new("Ann", 1.0)).await?;

    assert!(entry.date >= before);
    assert!(sale.date >= before);
    Ok(())
}

#[tokio::test]
async fn test_get_expenses_filters() -> Result<()> {
    let (store, _backend) = memory_store().await?;
    SampleShop::populate(&store).await?;
    store
        .add_expense(NewLedgerEntry::expense(5.0).with_category("supplies"))
        .await?;

    assert_eq!(store.get_expenses(None).await?.len(), 3);

    let expenses = store.get_expenses(Some(EntryType::Expense)).await?;
    assert_eq!(expenses.len(), 2);
    assert!(expenses.iter().all(|e| e.entry_type == EntryType::Expense));

    let income = store.get_expenses(Some(EntryType::Income)).await?;
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].category, "refunds");

    let supplies = store.get_expenses_by_category("supplies").await?;
    let amounts: Vec<f64> = supplies.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![45.0, 5.0]);

    assert!(store.get_expenses_by_category("Supplies").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_delete_expense_and_sale() -> Result<()> {
    let (store, _backend) = memory_store().await?;
    let entry = store.add_expense(NewLedgerEntry::expense(20.0)).await?;
    let sale = store.add_sale(NewSale::new("Ann", 50.0)).await?;

    assert!(store.delete_expense(&entry.id).await?);
    assert!(store.delete_sale(&sale.id).await?);
    assert!(store.get_expenses(None).await?.is_empty());
    assert!(store.get_sales().await?.is_empty());
    assert_eq!(store.net_profit().await?, 0.0);
    Ok(())
}

#[tokio::test]
async fn test_delete_unknown_id_leaves_collections_unchanged() -> Result<()> {
    let (store, _backend) = memory_store().await?;
    SampleShop::populate(&store).await?;
    let sales = store.get_sales().await?;
    let entries = store.get_expenses(None).await?;

    assert!(!store.delete_sale("nope").await?);
    assert!(!store.delete_expense("nope").await?);

    assert_eq!(store.get_sales().await?, sales);
    assert_eq!(store.get_expenses(None).await?, entries);
    Ok(())
}

#[tokio::test]
async fn test_recent_transactions_returns_newest_first() -> Result<()> {
    let (store, _backend) = memory_store().await?;

    for (amount, date) in [(1.0, "2024-03-01"), (2.0, "2024-03-05"), (3.0, "2024-03-03")] {
        store
            .add_sale(NewSale::new("c", amount).with_date(parse_date(date)))
            .await?;
    }
    for (amount, date) in [(4.0, "2024-03-04"), (5.0, "2024-03-02")] {
        store
            .add_expense(NewLedgerEntry::expense(amount).with_date(parse_date(date)))
            .await?;
    }

    let recent = store.recent_transactions(2).await?;
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].date(), parse_date("2024-03-05"));
    assert_eq!(recent[1].date(), parse_date("2024-03-04"));
    assert!(matches!(recent[0], Transaction::Sale(_)));
    assert!(matches!(recent[1], Transaction::Entry(_)));

    let all = store.recent_transactions(100).await?;
    assert_eq!(all.len(), 5);
    assert!(all.windows(2).all(|w| w[0].date() >= w[1].date()));
    Ok(())
}

#[tokio::test]
async fn test_recent_transactions_zero_limit() -> Result<()> {
    let (store, _backend) = memory_store().await?;
    SampleShop::populate(&store).await?;
    assert!(store.recent_transactions(0).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_dashboard_summary() -> Result<()> {
    let (store, _backend) = memory_store().await?;
    SampleShop::populate(&store).await?;

    let summary = store.dashboard_summary().await?;
    assert_eq!(summary.total_revenue, 150.0);
    assert_eq!(summary.total_expenses, 45.0);
    assert_eq!(summary.total_income, 10.0);
    assert_eq!(summary.net_profit, 115.0);
    assert_eq!(summary.item_count, 2);
    assert_eq!(summary.low_stock_count, 1);
    Ok(())
}

#[tokio::test]
async fn test_spending_insights_and_category_totals() -> Result<()> {
    let (store, _backend) = memory_store().await?;
    SampleShop::populate(&store).await?;
    store
        .add_expense(NewLedgerEntry::expense(15.0).with_category("rent"))
        .await?;

    let insights = store.spending_insights().await?;
    assert_eq!(insights.total_spending, 60.0);
    assert_eq!(insights.entry_count, 3);

    let totals = store.expense_totals_by_category(EntryType::Expense).await?;
    let names: Vec<&str> = totals.iter().map(|t| t.category.as_str()).collect();
    assert_eq!(names, vec!["rent", "supplies"]);
    assert_eq!(totals[0].total, 15.0);
    assert_eq!(totals[1].count, 1);
    assert_eq!(totals[0].percentage, 25.0);
    assert_eq!(totals[1].percentage, 75.0);
    Ok(())
}

#[tokio::test]
async fn test_analytics_on_empty_store() -> Result<()> {
    let (store, _backend) = memory_store().await?;

    assert_eq!(store.total_revenue().await?, 0.0);
    assert_eq!(store.net_profit().await?, 0.0);
    assert!(store.low_stock_items().await?.is_empty());
    assert!(store.recent_transactions(10).await?.is_empty());
    assert!(store
        .expense_totals_by_category(EntryType::Expense)
        .await?
        .is_empty());
    assert_eq!(store.spending_insights().await?.entry_count, 0);
    Ok(())
}
