//! Report Models

use super::billing::InvoiceType;
use serde::{Deserialize, Serialize};

/// Revenue of one invoice type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RevenueByType {
    pub invoice_type: InvoiceType,
    pub total_invoices: i64,
    pub total_revenue: f64,
    pub paid_amount: f64,
    pub pending_amount: f64,
}

/// Paid revenue of one calendar month (`YYYY-MM`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
    pub invoice_count: i64,
}

/// Billing summary report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub revenue_by_type: Vec<RevenueByType>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
}
