//! Billing API Handlers
//!
//! `total_amount = amount - discount + tax` is always computed here; clients
//! never send it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{
    Invoice, InvoiceCreate, InvoiceCreated, InvoiceUpdate, PaymentStatusUpdate, RevenueSummary,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{billing, customer, membership, order, report};
use crate::utils::money::{grand_total, to_decimal, to_f64, validate_amount};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_date, validate_optional_text};
use crate::utils::{ApiJson, ApiResponse, AppError, AppResult, ErrorCode};

fn invoice_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::InvoiceNotFound).with_detail("invoice_id", id)
}

/// GET /api/billing
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Invoice>>> {
    let invoices = billing::find_all(state.pool()).await?;
    Ok(ApiResponse::success(invoices))
}

/// GET /api/billing/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Invoice>> {
    let invoice = billing::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| invoice_not_found(id))?;
    Ok(ApiResponse::success(invoice))
}

/// GET /api/billing/customer/{customer_id}
pub async fn list_by_customer(
    State(state): State<ServerState>,
    Path(customer_id): Path<i64>,
) -> AppResult<ApiResponse<Vec<Invoice>>> {
    let invoices = billing::find_by_customer(state.pool(), customer_id).await?;
    Ok(ApiResponse::success(invoices))
}

/// POST /api/billing
///
/// Without `amount` the linked order's grand_total is billed
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    ApiJson(payload): ApiJson<InvoiceCreate>,
) -> AppResult<(StatusCode, ApiResponse<InvoiceCreated>)> {
    let discount = payload.discount.unwrap_or(0.0);
    let tax = payload.tax.unwrap_or(0.0);
    validate_amount(discount, "discount")?;
    validate_amount(tax, "tax")?;
    validate_optional_date(&payload.due_date, "due_date")?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let pool = state.pool();

    if let Some(customer_id) = payload.customer_id
        && !customer::exists(pool, customer_id).await?
    {
        return Err(AppError::new(ErrorCode::CustomerNotFound).with_detail("customer_id", customer_id));
    }

    if let Some(membership_id) = payload.membership_id
        && membership::find_by_id(pool, membership_id).await?.is_none()
    {
        return Err(AppError::not_found(format!("Membership {membership_id}")));
    }

    let order_total = match payload.order_id {
        Some(order_id) => Some(
            order::grand_total(pool, order_id)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id))?,
        ),
        None => None,
    };

    let amount = payload
        .amount
        .or(order_total)
        .ok_or_else(|| AppError::new(ErrorCode::InvoiceAmountRequired))?;

    // amounts taken from an order are bounded too
    validate_amount(amount, "amount")?;
    let subtotal = to_decimal(amount, "amount")?;
    if to_decimal(discount, "discount")? > subtotal {
        return Err(
            AppError::with_message(ErrorCode::InvalidAmount, "discount exceeds invoice amount")
                .with_detail("field", "discount"),
        );
    }
    let total_amount = to_f64(grand_total(subtotal, discount, tax)?);

    let invoice = billing::create(
        pool,
        billing::NewInvoice {
            data: &payload,
            amount: to_f64(subtotal),
            discount,
            tax,
            total_amount,
            created_by: Some(current.id),
        },
    )
    .await?;

    tracing::info!(
        invoice_id = invoice.invoice_id,
        invoice_number = %invoice.invoice_number,
        total_amount,
        "Invoice created"
    );

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(InvoiceCreated {
            id: invoice.invoice_id,
            invoice_number: invoice.invoice_number,
            total_amount: invoice.total_amount,
        }),
    ))
}

/// PUT /api/billing/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<InvoiceUpdate>,
) -> AppResult<ApiResponse<Invoice>> {
    validate_optional_date(&payload.due_date, "due_date")?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let updated = billing::update(state.pool(), id, &payload)
        .await?
        .ok_or_else(|| invoice_not_found(id))?;
    Ok(ApiResponse::success(updated))
}

/// PATCH /api/billing/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<PaymentStatusUpdate>,
) -> AppResult<ApiResponse<()>> {
    if !billing::set_payment_status(state.pool(), id, payload.payment_status).await? {
        return Err(invoice_not_found(id));
    }
    tracing::info!(invoice_id = id, payment_status = ?payload.payment_status, "Invoice payment updated");
    Ok(ApiResponse::ok("Payment status updated"))
}

/// DELETE /api/billing/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    if !billing::delete(state.pool(), id).await? {
        return Err(invoice_not_found(id));
    }
    Ok(ApiResponse::ok("Invoice deleted"))
}

/// GET /api/billing/reports/summary
pub async fn summary(State(state): State<ServerState>) -> AppResult<ApiResponse<RevenueSummary>> {
    let summary = report::summary(state.pool()).await?;
    Ok(ApiResponse::success(summary))
}
