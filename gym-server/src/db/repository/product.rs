//! Product and Category Repository

use super::{RepoError, RepoResult};
use shared::ErrorCode;
use shared::models::{
    Product, ProductCategory, ProductCategoryCreate, ProductCreate, ProductUpdate,
};
use sqlx::{SqliteConnection, SqlitePool};

const PRODUCT_SELECT: &str = "SELECT p.product_id, p.category_id, c.category_name, p.product_name, p.description, p.sku, p.price, p.stock_qty, p.low_stock_alert, p.image_url, p.is_active, p.created_at, p.updated_at FROM products p LEFT JOIN product_categories c ON p.category_id = c.category_id";

/// Default reorder threshold
pub const DEFAULT_LOW_STOCK_ALERT: i64 = 5;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE p.is_deleted = 0 ORDER BY p.product_name, p.product_id");
    let rows = sqlx::query_as::<_, Product>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE p.product_id = ? AND p.is_deleted = 0");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Products at or below their reorder threshold, lowest stock first
pub async fn find_low_stock(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let sql = format!(
        "{PRODUCT_SELECT} WHERE p.is_deleted = 0 AND p.is_active = 1 AND p.stock_qty <= p.low_stock_alert ORDER BY p.stock_qty, p.product_name"
    );
    let rows = sqlx::query_as::<_, Product>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

async fn ensure_category(pool: &SqlitePool, category_id: Option<i64>) -> RepoResult<()> {
    let Some(category_id) = category_id else {
        return Ok(());
    };
    let found: Option<i64> = sqlx::query_scalar(
        "SELECT category_id FROM product_categories WHERE category_id = ? AND is_deleted = 0",
    )
    .bind(category_id)
    .fetch_optional(pool)
    .await?;
    match found {
        Some(_) => Ok(()),
        None => Err(RepoError::business(ErrorCode::CategoryNotFound)),
    }
}

fn sku_conflict(err: RepoError) -> RepoError {
    match err {
        RepoError::Duplicate(_) => RepoError::business(ErrorCode::SkuExists),
        other => other,
    }
}

pub async fn create(
    pool: &SqlitePool,
    data: &ProductCreate,
    created_by: Option<i64>,
) -> RepoResult<Product> {
    ensure_category(pool, data.category_id).await?;

    let now = shared::util::now_millis();
    let id = sqlx::query(
        "INSERT INTO products (category_id, product_name, description, sku, price, stock_qty, low_stock_alert, image_url, is_active, created_by, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?10, ?10)",
    )
    .bind(data.category_id)
    .bind(data.product_name.trim())
    .bind(&data.description)
    .bind(&data.sku)
    .bind(data.price)
    .bind(data.stock_qty.unwrap_or(0))
    .bind(data.low_stock_alert.unwrap_or(DEFAULT_LOW_STOCK_ALERT))
    .bind(&data.image_url)
    .bind(created_by)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| sku_conflict(e.into()))?
    .last_insert_rowid();

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Returns `None` when no live product has this id
pub async fn update(pool: &SqlitePool, id: i64, data: &ProductUpdate) -> RepoResult<Option<Product>> {
    ensure_category(pool, data.category_id).await?;

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE products SET product_name = COALESCE(?1, product_name), price = COALESCE(?2, price), category_id = COALESCE(?3, category_id), description = COALESCE(?4, description), sku = COALESCE(?5, sku), low_stock_alert = COALESCE(?6, low_stock_alert), image_url = COALESCE(?7, image_url), is_active = COALESCE(?8, is_active), updated_at = ?9 WHERE product_id = ?10 AND is_deleted = 0",
    )
    .bind(&data.product_name)
    .bind(data.price)
    .bind(data.category_id)
    .bind(&data.description)
    .bind(&data.sku)
    .bind(data.low_stock_alert)
    .bind(&data.image_url)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| sku_conflict(e.into()))?;
    if rows.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE products SET is_deleted = 1, is_active = 0, updated_at = ? WHERE product_id = ? AND is_deleted = 0",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Apply a signed stock delta; the result never goes below zero
pub async fn adjust_stock(pool: &SqlitePool, id: i64, delta: i64) -> RepoResult<Product> {
    let rows = sqlx::query(
        "UPDATE products SET stock_qty = stock_qty + ?1, updated_at = ?2 WHERE product_id = ?3 AND is_deleted = 0 AND stock_qty + ?1 >= 0",
    )
    .bind(delta)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    match find_by_id(pool, id).await? {
        None => Err(RepoError::business(ErrorCode::ProductNotFound)),
        Some(_) if rows.rows_affected() == 0 => Err(RepoError::InsufficientStock(format!(
            "Stock of product {id} cannot go below zero"
        ))),
        Some(product) => Ok(product),
    }
}

// ── Transaction helpers (order placement) ───────────────────────────

/// Name and current price of a sellable product
pub async fn price_for_sale(
    conn: &mut SqliteConnection,
    id: i64,
) -> RepoResult<Option<(String, f64)>> {
    let row: Option<(String, f64)> = sqlx::query_as(
        "SELECT product_name, price FROM products WHERE product_id = ? AND is_deleted = 0",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

/// Guarded decrement; `false` when stock would go negative
pub async fn decrement_stock(conn: &mut SqliteConnection, id: i64, qty: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE products SET stock_qty = stock_qty - ?1, updated_at = ?2 WHERE product_id = ?3 AND is_deleted = 0 AND stock_qty >= ?1",
    )
    .bind(qty)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() > 0)
}

// ── Categories ──────────────────────────────────────────────────────

pub async fn find_all_categories(pool: &SqlitePool) -> RepoResult<Vec<ProductCategory>> {
    let rows = sqlx::query_as::<_, ProductCategory>(
        "SELECT category_id, category_name, description, is_active FROM product_categories WHERE is_deleted = 0 ORDER BY category_name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create_category(
    pool: &SqlitePool,
    data: &ProductCategoryCreate,
) -> RepoResult<ProductCategory> {
    let id = sqlx::query(
        "INSERT INTO product_categories (category_name, description, is_active) VALUES (?1, ?2, 1)",
    )
    .bind(data.category_name.trim())
    .bind(&data.description)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::business(ErrorCode::CategoryNameExists),
        other => other,
    })?
    .last_insert_rowid();

    let row = sqlx::query_as::<_, ProductCategory>(
        "SELECT category_id, category_name, description, is_active FROM product_categories WHERE category_id = ?",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;

    fn product(name: &str, price: f64, stock: i64) -> ProductCreate {
        ProductCreate {
            product_name: name.into(),
            price,
            stock_qty: Some(stock),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_with_defaults() {
        let (pool, _dir) = test_pool().await;
        let p = create(
            &pool,
            &ProductCreate {
                product_name: "Protein Bar".into(),
                price: 2.5,
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
        assert_eq!(p.stock_qty, 0);
        assert_eq!(p.low_stock_alert, DEFAULT_LOW_STOCK_ALERT);
        assert!(p.category_name.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_sku() {
        let (pool, _dir) = test_pool().await;
        let mut data = product("Shaker", 9.0, 1);
        data.sku = Some("SHK-1".into());
        create(&pool, &data, None).await.unwrap();
        let err = create(&pool, &data, None).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::SkuExists, _)));
    }

    #[tokio::test]
    async fn test_unknown_category_rejected() {
        let (pool, _dir) = test_pool().await;
        let mut data = product("Shaker", 9.0, 1);
        data.category_id = Some(77);
        let err = create(&pool, &data, None).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::CategoryNotFound, _)));
    }

    #[tokio::test]
    async fn test_adjust_stock_is_guarded() {
        let (pool, _dir) = test_pool().await;
        let p = create(&pool, &product("Towel", 5.0, 3), None).await.unwrap();

        assert_eq!(adjust_stock(&pool, p.product_id, 7).await.unwrap().stock_qty, 10);
        assert_eq!(adjust_stock(&pool, p.product_id, -10).await.unwrap().stock_qty, 0);

        let err = adjust_stock(&pool, p.product_id, -1).await.unwrap_err();
        assert!(matches!(err, RepoError::InsufficientStock(_)));
        assert_eq!(find_by_id(&pool, p.product_id).await.unwrap().unwrap().stock_qty, 0);

        let err = adjust_stock(&pool, 4040, 1).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::ProductNotFound, _)));
    }

    #[tokio::test]
    async fn test_low_stock_threshold_is_inclusive() {
        let (pool, _dir) = test_pool().await;
        let at = create(&pool, &product("At threshold", 1.0, 5), None).await.unwrap();
        create(&pool, &product("Plenty", 1.0, 6), None).await.unwrap();
        let empty = create(&pool, &product("Empty", 1.0, 0), None).await.unwrap();

        let low: Vec<i64> = find_low_stock(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.product_id)
            .collect();
        assert_eq!(low, vec![empty.product_id, at.product_id]);
    }

    #[tokio::test]
    async fn test_category_name_unique() {
        let (pool, _dir) = test_pool().await;
        let data = ProductCategoryCreate {
            category_name: "Supplements".into(),
            description: None,
        };
        let c = create_category(&pool, &data).await.unwrap();
        assert_eq!(c.category_name, "Supplements");
        let err = create_category(&pool, &data).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::CategoryNameExists, _)));
    }
}
