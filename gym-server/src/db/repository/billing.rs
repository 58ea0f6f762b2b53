//! Invoice Repository

use super::{RepoError, RepoResult};
use shared::models::{Invoice, InvoiceCreate, InvoiceUpdate, PaymentStatus};
use sqlx::SqlitePool;

const INVOICE_SELECT: &str = "SELECT i.invoice_id, i.invoice_number, i.customer_id, c.full_name AS customer_name, c.phone AS customer_phone, i.membership_id, p.plan_name, i.order_id, i.invoice_type, i.amount, i.discount, i.tax, i.total_amount, i.payment_method, i.payment_status, i.invoice_date, i.due_date, i.notes, i.created_by_user, u.full_name AS created_by_name, i.created_at, i.updated_at FROM invoices i LEFT JOIN customers c ON i.customer_id = c.customer_id LEFT JOIN customer_memberships m ON i.membership_id = m.membership_id LEFT JOIN membership_plans p ON m.plan_id = p.plan_id LEFT JOIN users u ON i.created_by_user = u.user_id";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Invoice>> {
    let sql = format!("{INVOICE_SELECT} WHERE i.is_deleted = 0 ORDER BY i.invoice_date DESC, i.invoice_id DESC");
    let rows = sqlx::query_as::<_, Invoice>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Invoice>> {
    let sql = format!("{INVOICE_SELECT} WHERE i.invoice_id = ? AND i.is_deleted = 0");
    let row = sqlx::query_as::<_, Invoice>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<Vec<Invoice>> {
    let sql = format!(
        "{INVOICE_SELECT} WHERE i.customer_id = ? AND i.is_deleted = 0 ORDER BY i.invoice_date DESC, i.invoice_id DESC"
    );
    let rows = sqlx::query_as::<_, Invoice>(&sql)
        .bind(customer_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Amounts already validated and computed by the caller
pub struct NewInvoice<'a> {
    pub data: &'a InvoiceCreate,
    pub amount: f64,
    pub discount: f64,
    pub tax: f64,
    pub total_amount: f64,
    pub created_by: Option<i64>,
}

/// `INV-YYYYMMDD-000042`
pub fn invoice_number(date: chrono::NaiveDate, id: i64) -> String {
    format!("INV-{}-{:06}", date.format("%Y%m%d"), id)
}

/// Insert and number an invoice in one transaction
///
/// The number is derived from the row id, so it is written right after the insert.
pub async fn create(pool: &SqlitePool, new: NewInvoice<'_>) -> RepoResult<Invoice> {
    let now = shared::util::now_millis();
    let data = new.data;
    let mut tx = pool.begin().await?;

    let placeholder = format!("PENDING-{}", uuid::Uuid::new_v4());
    let id = sqlx::query(
        "INSERT INTO invoices (invoice_number, customer_id, membership_id, order_id, invoice_type, amount, discount, tax, total_amount, payment_method, payment_status, invoice_date, due_date, notes, created_by_user, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?12, ?12)",
    )
    .bind(&placeholder)
    .bind(data.customer_id)
    .bind(data.membership_id)
    .bind(data.order_id)
    .bind(data.invoice_type)
    .bind(new.amount)
    .bind(new.discount)
    .bind(new.tax)
    .bind(new.total_amount)
    .bind(data.payment_method.unwrap_or_default())
    .bind(data.payment_status.unwrap_or_default())
    .bind(now)
    .bind(&data.due_date)
    .bind(&data.notes)
    .bind(new.created_by)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    sqlx::query("UPDATE invoices SET invoice_number = ? WHERE invoice_id = ?")
        .bind(invoice_number(chrono::Utc::now().date_naive(), id))
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create invoice".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &InvoiceUpdate) -> RepoResult<Option<Invoice>> {
    let rows = sqlx::query(
        "UPDATE invoices SET payment_method = COALESCE(?1, payment_method), due_date = COALESCE(?2, due_date), notes = COALESCE(?3, notes), updated_at = ?4 WHERE invoice_id = ?5 AND is_deleted = 0",
    )
    .bind(data.payment_method)
    .bind(&data.due_date)
    .bind(&data.notes)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

pub async fn set_payment_status(
    pool: &SqlitePool,
    id: i64,
    payment_status: PaymentStatus,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE invoices SET payment_status = ?1, updated_at = ?2 WHERE invoice_id = ?3 AND is_deleted = 0",
    )
    .bind(payment_status)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE invoices SET is_deleted = 1, updated_at = ? WHERE invoice_id = ? AND is_deleted = 0",
    )
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
