use serde::{Deserialize, Serialize};

use crate::domain::Amount;

/// Headline figures for the dashboard view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_revenue: Amount,
    pub total_expenses: Amount,
    pub total_income: Amount,
    pub net_profit: Amount,
    pub item_count: usize,
    pub low_stock_count: usize,
    pub inventory_value: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingInsights {
    /// Sum of expense-type entries only
    pub total_spending: Amount,
    /// Number of ledger entries of either type
    pub entry_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Amount,
    pub count: usize,
    pub percentage: f64,
}
