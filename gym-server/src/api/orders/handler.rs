//! Order API Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{
    Order, OrderCreate, OrderDetail, OrderPlaced, OrderStatusUpdate, OrderUpdate,
    PaymentStatusUpdate,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{customer, order};
use crate::orders::place_order;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{ApiJson, ApiResponse, AppError, AppResult, ErrorCode};

fn order_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", id)
}

/// GET /api/orders
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Order>>> {
    let orders = order::find_all(state.pool()).await?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/orders/{id} - header plus items
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<OrderDetail>> {
    let pool = state.pool();
    let header = order::find_by_id(pool, id)
        .await?
        .ok_or_else(|| order_not_found(id))?;
    let items = order::find_items(pool, id).await?;
    Ok(ApiResponse::success(OrderDetail {
        order: header,
        items,
    }))
}

/// POST /api/orders - place an order (one transaction)
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    ApiJson(payload): ApiJson<OrderCreate>,
) -> AppResult<(StatusCode, ApiResponse<OrderPlaced>)> {
    let placed = place_order(state.pool(), &payload, Some(current.id)).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("Order placed", placed),
    ))
}

/// PUT /api/orders/{id} - header fields only
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<OrderUpdate>,
) -> AppResult<ApiResponse<Order>> {
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    let pool = state.pool();
    if let Some(customer_id) = payload.customer_id
        && !customer::exists(pool, customer_id).await?
    {
        return Err(AppError::new(ErrorCode::CustomerNotFound).with_detail("customer_id", customer_id));
    }

    let updated = order::update(pool, id, &payload)
        .await?
        .ok_or_else(|| order_not_found(id))?;
    Ok(ApiResponse::success(updated))
}

/// PATCH /api/orders/{id}/payment
pub async fn update_payment(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<PaymentStatusUpdate>,
) -> AppResult<ApiResponse<()>> {
    if !order::set_payment_status(state.pool(), id, payload.payment_status).await? {
        return Err(order_not_found(id));
    }
    tracing::info!(order_id = id, payment_status = ?payload.payment_status, "Order payment updated");
    Ok(ApiResponse::ok("Payment status updated"))
}

/// PATCH /api/orders/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<OrderStatusUpdate>,
) -> AppResult<ApiResponse<()>> {
    if !order::set_status(state.pool(), id, payload.status).await? {
        return Err(order_not_found(id));
    }
    tracing::info!(order_id = id, status = ?payload.status, "Order status updated");
    Ok(ApiResponse::ok("Order status updated"))
}

/// DELETE /api/orders/{id} - soft delete, stock is not restored
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    if !order::delete(state.pool(), id).await? {
        return Err(order_not_found(id));
    }
    Ok(ApiResponse::ok("Order deleted"))
}
