//! Product API Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{
    Product, ProductCategory, ProductCategoryCreate, ProductCreate, ProductUpdate, StockAdjust,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::product;
use crate::utils::money::validate_amount;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{ApiJson, ApiResponse, AppError, AppResult, ErrorCode};

fn product_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", id)
}

fn non_negative(value: Option<i64>, field: &str) -> AppResult<()> {
    match value {
        Some(v) if v < 0 => Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must not be negative"),
        )
        .with_detail("field", field)),
        _ => Ok(()),
    }
}

fn validate_details(
    description: &Option<String>,
    sku: &Option<String>,
    image_url: &Option<String>,
    low_stock_alert: Option<i64>,
) -> AppResult<()> {
    validate_optional_text(description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(sku, "sku", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(image_url, "image_url", MAX_URL_LEN)?;
    non_negative(low_stock_alert, "low_stock_alert")
}

/// GET /api/products
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Product>>> {
    let products = product::find_all(state.pool()).await?;
    Ok(ApiResponse::success(products))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Product>> {
    let found = product::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| product_not_found(id))?;
    Ok(ApiResponse::success(found))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    ApiJson(payload): ApiJson<ProductCreate>,
) -> AppResult<(StatusCode, ApiResponse<Product>)> {
    validate_required_text(&payload.product_name, "product_name", MAX_NAME_LEN)?;
    validate_amount(payload.price, "price")?;
    non_negative(payload.stock_qty, "stock_qty")?;
    validate_details(
        &payload.description,
        &payload.sku,
        &payload.image_url,
        payload.low_stock_alert,
    )?;

    let created = product::create(state.pool(), &payload, Some(current.id)).await?;
    tracing::info!(
        product_id = created.product_id,
        stock = created.stock_qty,
        "Product created"
    );

    Ok((StatusCode::CREATED, ApiResponse::success(created)))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<ProductUpdate>,
) -> AppResult<ApiResponse<Product>> {
    if let Some(name) = &payload.product_name {
        validate_required_text(name, "product_name", MAX_NAME_LEN)?;
    }
    if let Some(price) = payload.price {
        validate_amount(price, "price")?;
    }
    validate_details(
        &payload.description,
        &payload.sku,
        &payload.image_url,
        payload.low_stock_alert,
    )?;

    let updated = product::update(state.pool(), id, &payload)
        .await?
        .ok_or_else(|| product_not_found(id))?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/products/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    if !product::delete(state.pool(), id).await? {
        return Err(product_not_found(id));
    }
    Ok(ApiResponse::ok("Product deleted"))
}

/// PATCH /api/products/{id}/stock - signed stock delta
pub async fn adjust_stock(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<StockAdjust>,
) -> AppResult<ApiResponse<Product>> {
    let adjusted = product::adjust_stock(state.pool(), id, payload.qty).await?;
    tracing::info!(
        product_id = id,
        delta = payload.qty,
        stock = adjusted.stock_qty,
        by = current.id,
        "Stock adjusted"
    );
    Ok(ApiResponse::success(adjusted))
}

/// GET /api/products/alerts/low-stock
pub async fn low_stock(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Product>>> {
    let products = product::find_low_stock(state.pool()).await?;
    Ok(ApiResponse::success(products))
}

// ── Categories ──────────────────────────────────────────────────────

/// GET /api/products/categories
pub async fn list_categories(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<Vec<ProductCategory>>> {
    let categories = product::find_all_categories(state.pool()).await?;
    Ok(ApiResponse::success(categories))
}

/// POST /api/products/categories
pub async fn create_category(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<ProductCategoryCreate>,
) -> AppResult<(StatusCode, ApiResponse<ProductCategory>)> {
    validate_required_text(&payload.category_name, "category_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let created = product::create_category(state.pool(), &payload).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(created)))
}
