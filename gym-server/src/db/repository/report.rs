//! Reporting queries (read only)

use super::RepoResult;
use shared::models::{MonthlyRevenue, Product, RevenueByType, RevenueSummary};
use sqlx::SqlitePool;

/// Months returned by the monthly rollup
pub const MONTHLY_WINDOW: i64 = 12;

/// Revenue per invoice type with paid and pending subtotals
pub async fn revenue_by_type(pool: &SqlitePool) -> RepoResult<Vec<RevenueByType>> {
    let rows = sqlx::query_as::<_, RevenueByType>(
        "SELECT invoice_type, COUNT(*) AS total_invoices, COALESCE(SUM(total_amount), 0.0) AS total_revenue, COALESCE(SUM(CASE WHEN payment_status = 'paid' THEN total_amount ELSE 0.0 END), 0.0) AS paid_amount, COALESCE(SUM(CASE WHEN payment_status = 'pending' THEN total_amount ELSE 0.0 END), 0.0) AS pending_amount FROM invoices WHERE is_deleted = 0 GROUP BY invoice_type ORDER BY total_revenue DESC, invoice_type",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Paid revenue per month, newest first
pub async fn monthly_revenue(pool: &SqlitePool) -> RepoResult<Vec<MonthlyRevenue>> {
    let rows = sqlx::query_as::<_, MonthlyRevenue>(
        "SELECT strftime('%Y-%m', invoice_date / 1000, 'unixepoch') AS month, COALESCE(SUM(total_amount), 0.0) AS revenue, COUNT(*) AS invoice_count FROM invoices WHERE is_deleted = 0 AND payment_status = 'paid' GROUP BY month ORDER BY month DESC LIMIT ?",
    )
    .bind(MONTHLY_WINDOW)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn summary(pool: &SqlitePool) -> RepoResult<RevenueSummary> {
    Ok(RevenueSummary {
        revenue_by_type: revenue_by_type(pool).await?,
        monthly_revenue: monthly_revenue(pool).await?,
    })
}

pub async fn low_stock(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    super::product::find_low_stock(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;
    use shared::models::InvoiceType;

    async fn invoice(pool: &SqlitePool, kind: &str, total: f64, status: &str, date_ms: i64) {
        sqlx::query(
            "INSERT INTO invoices (invoice_number, invoice_type, amount, total_amount, payment_status, invoice_date, created_at, updated_at) VALUES (?1, ?2, ?3, ?3, ?4, ?5, ?5, ?5)",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(kind)
        .bind(total)
        .bind(status)
        .bind(date_ms)
        .execute(pool)
        .await
        .unwrap();
    }

    // 2024-01-15 and 2024-03-10 (UTC), in ms
    const JAN: i64 = 1_705_320_000_000;
    const MAR: i64 = 1_710_072_000_000;

    #[tokio::test]
    async fn test_revenue_by_type_splits_paid_and_pending() {
        let (pool, _dir) = test_pool().await;
        invoice(&pool, "membership", 100.0, "paid", JAN).await;
        invoice(&pool, "membership", 50.0, "pending", JAN).await;
        invoice(&pool, "product", 20.0, "paid", MAR).await;

        let rows = revenue_by_type(&pool).await.unwrap();
        assert_eq!(rows.len(), 2);
        let membership = &rows[0];
        assert_eq!(membership.invoice_type, InvoiceType::Membership);
        assert_eq!(membership.total_invoices, 2);
        assert_eq!(membership.total_revenue, 150.0);
        assert_eq!(membership.paid_amount, 100.0);
        assert_eq!(membership.pending_amount, 50.0);
    }

    #[tokio::test]
    async fn test_monthly_revenue_counts_paid_only() {
        let (pool, _dir) = test_pool().await;
        invoice(&pool, "membership", 100.0, "paid", JAN).await;
        invoice(&pool, "service", 30.0, "paid", JAN).await;
        invoice(&pool, "service", 999.0, "pending", JAN).await;
        invoice(&pool, "product", 20.0, "paid", MAR).await;

        let months = monthly_revenue(&pool).await.unwrap();
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "2024-03");
        assert_eq!(months[0].revenue, 20.0);
        assert_eq!(months[1].month, "2024-01");
        assert_eq!(months[1].revenue, 130.0);
        assert_eq!(months[1].invoice_count, 2);
    }

    #[tokio::test]
    async fn test_empty_summary() {
        let (pool, _dir) = test_pool().await;
        let summary = summary(&pool).await.unwrap();
        assert!(summary.revenue_by_type.is_empty());
        assert!(summary.monthly_revenue.is_empty());
    }
}
