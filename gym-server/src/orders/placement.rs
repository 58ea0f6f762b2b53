//! Order placement workflow
//!
//! 1. Validate the request (items, quantities, discount, tax, customer)
//! 2. BEGIN; insert the header first so the write lock is held before any read
//! 3. Per item: read the stored price, insert the line, guarded stock decrement
//! 4. Write back `total_amount` and `grand_total`; COMMIT
//!
//! Dropping the transaction on any error rolls everything back.

use rust_decimal::Decimal;
use shared::models::{OrderCreate, OrderPlaced};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::db::repository::{RepoError, customer, order, product};
use crate::utils::money::{add, grand_total, line_subtotal, to_decimal, to_f64, validate_amount};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, ErrorCode};

/// Order placement failure
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order must contain at least one item")]
    Empty,

    #[error("Quantity for product {product_id} must be a positive integer, got {quantity}")]
    InvalidQuantity { product_id: i64, quantity: i64 },

    #[error("{0}")]
    Invalid(AppError),

    #[error("Customer {0} not found")]
    CustomerNotFound(i64),

    #[error("Product {0} not found")]
    ProductNotFound(i64),

    #[error("Insufficient stock for product {product_id} (requested {requested})")]
    InsufficientStock { product_id: i64, requested: i64 },

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Repo(err.into())
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::Empty => AppError::with_message(ErrorCode::OrderEmpty, message),
            OrderError::InvalidQuantity { product_id, .. } => {
                AppError::with_message(ErrorCode::InvalidQuantity, message)
                    .with_detail("product_id", product_id)
            }
            OrderError::Invalid(e) => e,
            OrderError::CustomerNotFound(id) => {
                AppError::with_message(ErrorCode::CustomerNotFound, message)
                    .with_detail("customer_id", id)
            }
            OrderError::ProductNotFound(id) => {
                AppError::with_message(ErrorCode::ProductNotFound, message)
                    .with_detail("product_id", id)
            }
            OrderError::InsufficientStock {
                product_id,
                requested,
            } => AppError::with_message(ErrorCode::InsufficientStock, message)
                .with_detail("product_id", product_id)
                .with_detail("requested", requested),
            OrderError::Repo(e) => e.into(),
        }
    }
}

fn validate(data: &OrderCreate) -> Result<(), OrderError> {
    if data.items.is_empty() {
        return Err(OrderError::Empty);
    }
    if let Some(item) = data.items.iter().find(|i| i.quantity <= 0) {
        return Err(OrderError::InvalidQuantity {
            product_id: item.product_id,
            quantity: item.quantity,
        });
    }
    validate_amount(data.discount.unwrap_or(0.0), "discount").map_err(OrderError::Invalid)?;
    validate_amount(data.tax.unwrap_or(0.0), "tax").map_err(OrderError::Invalid)?;
    validate_optional_text(&data.notes, "notes", MAX_NOTE_LEN).map_err(OrderError::Invalid)?;
    Ok(())
}

/// Place an order
///
/// Prices come from the stored product rows, never from the request.
/// Returns the new order id with its item total and grand total.
pub async fn place_order(
    pool: &SqlitePool,
    data: &OrderCreate,
    processed_by: Option<i64>,
) -> Result<OrderPlaced, OrderError> {
    validate(data)?;

    if let Some(customer_id) = data.customer_id
        && !customer::exists(pool, customer_id).await?
    {
        return Err(OrderError::CustomerNotFound(customer_id));
    }

    let discount = data.discount.unwrap_or(0.0);
    let tax = data.tax.unwrap_or(0.0);

    let mut tx = pool.begin().await?;

    let header = order::NewOrderHeader {
        customer_id: data.customer_id,
        processed_by,
        notes: data.notes.as_deref(),
        discount,
        tax,
        payment_method: data.payment_method.unwrap_or_default(),
        payment_status: data.payment_status.unwrap_or_default(),
    };
    let order_id = order::insert_header(&mut *tx, &header).await?;

    let mut total = Decimal::ZERO;
    for item in &data.items {
        let Some((_, unit_price)) = product::price_for_sale(&mut *tx, item.product_id).await? else {
            return Err(OrderError::ProductNotFound(item.product_id));
        };

        let subtotal = line_subtotal(unit_price, item.quantity).map_err(OrderError::Invalid)?;
        order::insert_item(
            &mut *tx,
            order_id,
            item.product_id,
            item.quantity,
            unit_price,
            to_f64(subtotal),
        )
        .await?;

        if !product::decrement_stock(&mut *tx, item.product_id, item.quantity).await? {
            return Err(OrderError::InsufficientStock {
                product_id: item.product_id,
                requested: item.quantity,
            });
        }

        total = add(total, subtotal).map_err(OrderError::Invalid)?;
    }

    if to_decimal(discount, "discount").map_err(OrderError::Invalid)? > total {
        return Err(OrderError::Invalid(
            AppError::with_message(ErrorCode::InvalidAmount, "discount exceeds order total")
                .with_detail("field", "discount"),
        ));
    }

    let grand = grand_total(total, discount, tax).map_err(OrderError::Invalid)?;
    order::write_totals(&mut *tx, order_id, to_f64(total), to_f64(grand)).await?;

    tx.commit().await?;

    tracing::info!(
        order_id,
        items = data.items.len(),
        total = %total,
        grand_total = %grand,
        "Order placed"
    );

    Ok(OrderPlaced {
        id: order_id,
        total: to_f64(total),
        grand_total: to_f64(grand),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;
    use shared::models::{OrderItemInput, ProductCreate};

    async fn new_product(pool: &SqlitePool, name: &str, price: f64, stock: i64) -> i64 {
        product::create(
            pool,
            &ProductCreate {
                product_name: name.into(),
                price,
                stock_qty: Some(stock),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap()
        .product_id
    }

    async fn stock_of(pool: &SqlitePool, id: i64) -> i64 {
        product::find_by_id(pool, id).await.unwrap().unwrap().stock_qty
    }

    async fn row_count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    fn order_of(items: &[(i64, i64)]) -> OrderCreate {
        OrderCreate {
            items: items
                .iter()
                .map(|&(product_id, quantity)| OrderItemInput {
                    product_id,
                    quantity,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_yoga_mat_scenario() {
        let (pool, _dir) = test_pool().await;
        let mat = new_product(&pool, "Yoga Mat", 999.0, 30).await;

        let placed = place_order(&pool, &order_of(&[(mat, 5)]), None).await.unwrap();
        assert_eq!(placed.total, 4995.0);
        assert_eq!(placed.grand_total, 4995.0);
        assert_eq!(stock_of(&pool, mat).await, 25);

        let stored = order::find_by_id(&pool, placed.id).await.unwrap().unwrap();
        assert_eq!(stored.total_amount, 4995.0);
        assert_eq!(stored.item_count, 1);

        let items = order::find_items(&pool, placed.id).await.unwrap();
        assert_eq!(items[0].unit_price, 999.0);
        assert_eq!(items[0].subtotal, 4995.0);
        assert_eq!(items[0].product_name.as_deref(), Some("Yoga Mat"));
    }

    #[tokio::test]
    async fn test_total_is_sum_of_subtotals_to_the_cent() {
        let (pool, _dir) = test_pool().await;
        let a = new_product(&pool, "Water", 0.1, 100).await;
        let b = new_product(&pool, "Gel", 0.2, 100).await;
        let c = new_product(&pool, "Bar", 19.99, 100).await;

        let mut data = order_of(&[(a, 3), (b, 7), (c, 3)]);
        data.discount = Some(5.0);
        data.tax = Some(1.25);

        let placed = place_order(&pool, &data, None).await.unwrap();
        // 0.30 + 1.40 + 59.97
        assert_eq!(placed.total, 61.67);
        assert_eq!(placed.grand_total, 57.92);

        assert_eq!(row_count(&pool, "orders").await, 1);
        let items = order::find_items(&pool, placed.id).await.unwrap();
        assert_eq!(items.len(), 3);
        let sum: Decimal = items
            .iter()
            .map(|i| to_decimal(i.subtotal, "subtotal").unwrap())
            .sum();
        assert_eq!(to_f64(sum), placed.total);
    }

    #[tokio::test]
    async fn test_missing_product_rolls_back_everything() {
        let (pool, _dir) = test_pool().await;
        let mat = new_product(&pool, "Yoga Mat", 999.0, 30).await;

        let err = place_order(&pool, &order_of(&[(mat, 2), (9999, 1)]), None)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::ProductNotFound(9999)));

        assert_eq!(row_count(&pool, "orders").await, 0);
        assert_eq!(row_count(&pool, "order_items").await, 0);
        assert_eq!(stock_of(&pool, mat).await, 30);
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_back() {
        let (pool, _dir) = test_pool().await;
        let a = new_product(&pool, "Band", 10.0, 10).await;
        let b = new_product(&pool, "Rope", 15.0, 1).await;

        let err = place_order(&pool, &order_of(&[(a, 4), (b, 2)]), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::InsufficientStock {
                requested: 2,
                ..
            }
        ));
        assert_eq!(stock_of(&pool, a).await, 10);
        assert_eq!(stock_of(&pool, b).await, 1);
        assert_eq!(row_count(&pool, "orders").await, 0);

        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::InsufficientStock);
        assert_eq!(app.http_status(), http::StatusCode::CONFLICT);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_orders_never_oversell() {
        let (pool, _dir) = test_pool().await;
        let kb = new_product(&pool, "Kettlebell", 40.0, 5).await;

        let mut handles = Vec::new();
        for _ in 0..2 {
            let pool = pool.clone();
            handles.push(tokio::spawn(async move {
                place_order(&pool, &order_of(&[(kb, 3)]), None).await
            }));
        }

        let mut succeeded = 0;
        let mut refused = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(OrderError::InsufficientStock { .. }) => refused += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!((succeeded, refused), (1, 1));
        assert_eq!(stock_of(&pool, kb).await, 2);
        assert_eq!(row_count(&pool, "orders").await, 1);
    }

    #[tokio::test]
    async fn test_request_validation() {
        let (pool, _dir) = test_pool().await;
        let mat = new_product(&pool, "Yoga Mat", 999.0, 30).await;

        let err = place_order(&pool, &order_of(&[]), None).await.unwrap_err();
        assert!(matches!(err, OrderError::Empty));

        let err = place_order(&pool, &order_of(&[(mat, 0)]), None).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidQuantity { quantity: 0, .. }));

        let mut data = order_of(&[(mat, 1)]);
        data.discount = Some(-1.0);
        let err: AppError = place_order(&pool, &data, None).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::InvalidAmount);

        let mut data = order_of(&[(mat, 1)]);
        data.discount = Some(1000.0);
        let err: AppError = place_order(&pool, &data, None).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::InvalidAmount);
        assert_eq!(row_count(&pool, "orders").await, 0);

        let mut data = order_of(&[(mat, 1)]);
        data.customer_id = Some(31337);
        let err = place_order(&pool, &data, None).await.unwrap_err();
        assert!(matches!(err, OrderError::CustomerNotFound(31337)));

        assert_eq!(stock_of(&pool, mat).await, 30);
    }

    #[tokio::test]
    async fn test_unrepresentable_price_is_rejected_not_zeroed() {
        let (pool, _dir) = test_pool().await;
        let plated = new_product(&pool, "Gold Plated Dumbbell", 1e30, 10).await;

        let err: AppError = place_order(&pool, &order_of(&[(plated, 2)]), None)
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::InvalidAmount);
        assert_eq!(row_count(&pool, "orders").await, 0);
        assert_eq!(row_count(&pool, "order_items").await, 0);
        assert_eq!(stock_of(&pool, plated).await, 10);
    }

    #[tokio::test]
    async fn test_subtotal_overflow_is_rejected() {
        let (pool, _dir) = test_pool().await;
        let treadmill = new_product(&pool, "Treadmill", 1e20, 1).await;

        let err: AppError = place_order(&pool, &order_of(&[(treadmill, 1_000_000_000)]), None)
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::InvalidAmount);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
        assert_eq!(row_count(&pool, "orders").await, 0);
        assert_eq!(stock_of(&pool, treadmill).await, 1);
    }

    #[tokio::test]
    async fn test_price_change_does_not_touch_history() {
        let (pool, _dir) = test_pool().await;
        let mat = new_product(&pool, "Yoga Mat", 999.0, 30).await;
        let placed = place_order(&pool, &order_of(&[(mat, 1)]), None).await.unwrap();

        let repriced = shared::models::ProductUpdate {
            price: Some(1299.0),
            ..Default::default()
        };
        product::update(&pool, mat, &repriced).await.unwrap();

        let items = order::find_items(&pool, placed.id).await.unwrap();
        assert_eq!(items[0].unit_price, 999.0);
    }
}
