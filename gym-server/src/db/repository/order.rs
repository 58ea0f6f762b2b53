//! Order Repository
//!
//! Read side and header edits. Order placement lives in [`crate::orders`],
//! which uses the transaction helpers at the bottom of this file.

use super::RepoResult;
use shared::models::{
    Order, OrderItem, OrderStatus, OrderUpdate, PaymentMethod, PaymentStatus,
};
use sqlx::{SqliteConnection, SqlitePool};

const ORDER_SELECT: &str = "SELECT o.order_id, o.customer_id, c.full_name AS customer_name, o.processed_by, u.full_name AS processed_by_name, o.order_date, o.status, o.total_amount, o.discount, o.tax, o.grand_total, o.payment_method, o.payment_status, o.notes, (SELECT COUNT(*) FROM order_items i WHERE i.order_id = o.order_id) AS item_count, o.created_at, o.updated_at FROM orders o LEFT JOIN customers c ON o.customer_id = c.customer_id LEFT JOIN users u ON o.processed_by = u.user_id";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE o.is_deleted = 0 ORDER BY o.order_date DESC, o.order_id DESC");
    let rows = sqlx::query_as::<_, Order>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE o.order_id = ? AND o.is_deleted = 0");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Items joined with the product's current name and SKU
pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let rows = sqlx::query_as::<_, OrderItem>(
        "SELECT i.item_id, i.order_id, i.product_id, p.product_name, p.sku, i.quantity, i.unit_price, i.subtotal FROM order_items i LEFT JOIN products p ON i.product_id = p.product_id WHERE i.order_id = ? ORDER BY i.item_id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Grand total of a live order (used when invoicing an order)
pub async fn grand_total(pool: &SqlitePool, id: i64) -> RepoResult<Option<f64>> {
    let total: Option<f64> =
        sqlx::query_scalar("SELECT grand_total FROM orders WHERE order_id = ? AND is_deleted = 0")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(total)
}

/// Header fields only; items and totals are immutable once placed
pub async fn update(pool: &SqlitePool, id: i64, data: &OrderUpdate) -> RepoResult<Option<Order>> {
    let rows = sqlx::query(
        "UPDATE orders SET customer_id = COALESCE(?1, customer_id), status = COALESCE(?2, status), payment_method = COALESCE(?3, payment_method), notes = COALESCE(?4, notes), updated_at = ?5 WHERE order_id = ?6 AND is_deleted = 0",
    )
    .bind(data.customer_id)
    .bind(data.status)
    .bind(data.payment_method)
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
        "UPDATE orders SET payment_status = ?1, updated_at = ?2 WHERE order_id = ?3 AND is_deleted = 0",
    )
    .bind(payment_status)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn set_status(pool: &SqlitePool, id: i64, status: OrderStatus) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE orders SET status = ?1, updated_at = ?2 WHERE order_id = ?3 AND is_deleted = 0",
    )
    .bind(status)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Soft delete; stock is not restored
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE orders SET is_deleted = 1, updated_at = ? WHERE order_id = ? AND is_deleted = 0",
    )
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

// ── Transaction helpers (order placement) ───────────────────────────

/// Header values written before any item
pub struct NewOrderHeader<'a> {
    pub customer_id: Option<i64>,
    pub processed_by: Option<i64>,
    pub notes: Option<&'a str>,
    pub discount: f64,
    pub tax: f64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
}

/// Insert the header with zero totals
pub async fn insert_header(conn: &mut SqliteConnection, header: &NewOrderHeader<'_>) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = sqlx::query(
        "INSERT INTO orders (customer_id, processed_by, order_date, status, total_amount, discount, tax, grand_total, payment_method, payment_status, notes, created_at, updated_at) VALUES (?1, ?2, ?3, 'pending', 0, ?4, ?5, 0, ?6, ?7, ?8, ?3, ?3)",
    )
    .bind(header.customer_id)
    .bind(header.processed_by)
    .bind(now)
    .bind(header.discount)
    .bind(header.tax)
    .bind(header.payment_method)
    .bind(header.payment_status)
    .bind(header.notes)
    .execute(conn)
    .await?
    .last_insert_rowid();
    Ok(id)
}

pub async fn insert_item(
    conn: &mut SqliteConnection,
    order_id: i64,
    product_id: i64,
    quantity: i64,
    unit_price: f64,
    subtotal: f64,
) -> RepoResult<i64> {
    let id = sqlx::query(
        "INSERT INTO order_items (order_id, product_id, quantity, unit_price, subtotal) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(order_id)
    .bind(product_id)
    .bind(quantity)
    .bind(unit_price)
    .bind(subtotal)
    .execute(conn)
    .await?
    .last_insert_rowid();
    Ok(id)
}

pub async fn write_totals(
    conn: &mut SqliteConnection,
    order_id: i64,
    total_amount: f64,
    grand_total: f64,
) -> RepoResult<()> {
    sqlx::query("UPDATE orders SET total_amount = ?1, grand_total = ?2 WHERE order_id = ?3")
        .bind(total_amount)
        .bind(grand_total)
        .bind(order_id)
        .execute(conn)
        .await?;
    Ok(())
}
