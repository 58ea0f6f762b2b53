//! Customer API Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{
    Attendance, Customer, CustomerCreate, CustomerUpdate, Membership, MembershipAssign,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{attendance, customer, membership};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, parse_date,
    validate_optional_date, validate_optional_text, validate_required_text,
};
use crate::utils::{ApiJson, ApiResponse, AppError, AppResult, ErrorCode};

fn customer_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::CustomerNotFound).with_detail("customer_id", id)
}

async fn ensure_customer(state: &ServerState, id: i64) -> AppResult<()> {
    if customer::exists(state.pool(), id).await? {
        Ok(())
    } else {
        Err(customer_not_found(id))
    }
}

fn validate_contact(
    email: &Option<String>,
    date_of_birth: &Option<String>,
    address: &Option<String>,
    works: &Option<String>,
) -> AppResult<()> {
    validate_optional_text(email, "email", MAX_EMAIL_LEN)?;
    validate_optional_date(date_of_birth, "date_of_birth")?;
    validate_optional_text(address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(works, "works", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

/// GET /api/customers
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Customer>>> {
    let customers = customer::find_all(state.pool()).await?;
    Ok(ApiResponse::success(customers))
}

/// GET /api/customers/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Customer>> {
    let found = customer::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| customer_not_found(id))?;
    Ok(ApiResponse::success(found))
}

/// POST /api/customers
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    ApiJson(payload): ApiJson<CustomerCreate>,
) -> AppResult<(StatusCode, ApiResponse<Customer>)> {
    validate_required_text(&payload.full_name, "full_name", MAX_NAME_LEN)?;
    validate_required_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_contact(
        &payload.email,
        &payload.date_of_birth,
        &payload.address,
        &payload.works,
    )?;
    validate_optional_text(
        &payload.emergency_contact_name,
        "emergency_contact_name",
        MAX_NAME_LEN,
    )?;
    validate_optional_text(
        &payload.emergency_contact_phone,
        "emergency_contact_phone",
        MAX_SHORT_TEXT_LEN,
    )?;

    let created = customer::create(state.pool(), &payload, Some(current.id)).await?;
    tracing::info!(customer_id = created.customer_id, by = current.id, "Customer created");

    Ok((StatusCode::CREATED, ApiResponse::success(created)))
}

/// PUT /api/customers/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<CustomerUpdate>,
) -> AppResult<ApiResponse<Customer>> {
    if let Some(name) = &payload.full_name {
        validate_required_text(name, "full_name", MAX_NAME_LEN)?;
    }
    if let Some(phone) = &payload.phone {
        validate_required_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    }
    validate_contact(
        &payload.email,
        &payload.date_of_birth,
        &payload.address,
        &payload.works,
    )?;

    let updated = customer::update(state.pool(), id, &payload)
        .await?
        .ok_or_else(|| customer_not_found(id))?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/customers/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    if !customer::delete(state.pool(), id).await? {
        return Err(customer_not_found(id));
    }
    tracing::info!(customer_id = id, "Customer deleted");
    Ok(ApiResponse::ok("Customer deleted"))
}

// ── Memberships ─────────────────────────────────────────────────────

/// GET /api/customers/{id}/memberships
pub async fn list_memberships(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Vec<Membership>>> {
    ensure_customer(&state, id).await?;
    let rows = membership::find_by_customer(state.pool(), id).await?;
    Ok(ApiResponse::success(rows))
}

/// POST /api/customers/{id}/memberships
///
/// The previous active membership is marked expired in the same transaction
pub async fn assign_membership(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<MembershipAssign>,
) -> AppResult<(StatusCode, ApiResponse<Membership>)> {
    let start = parse_date(&payload.start_date, "start_date")?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let assigned = membership::assign(state.pool(), id, start, &payload, Some(current.id)).await?;
    tracing::info!(
        customer_id = id,
        membership_id = assigned.membership_id,
        plan_id = assigned.plan_id,
        end_date = %assigned.end_date,
        "Membership assigned"
    );

    Ok((StatusCode::CREATED, ApiResponse::success(assigned)))
}

// ── Attendance ──────────────────────────────────────────────────────

/// GET /api/customers/{id}/attendance (latest entries)
pub async fn list_attendance(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Vec<Attendance>>> {
    ensure_customer(&state, id).await?;
    let rows = attendance::find_by_customer(state.pool(), id).await?;
    Ok(ApiResponse::success(rows))
}

/// POST /api/customers/{id}/checkin
pub async fn check_in(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, ApiResponse<Attendance>)> {
    ensure_customer(&state, id).await?;
    let record = attendance::check_in(state.pool(), id, Some(current.id)).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("Checked in", record),
    ))
}

/// PUT /api/customers/checkout/{attendance_id}
pub async fn check_out(
    State(state): State<ServerState>,
    Path(attendance_id): Path<i64>,
) -> AppResult<ApiResponse<Attendance>> {
    let record = attendance::check_out(state.pool(), attendance_id).await?;
    Ok(ApiResponse::success_with_message("Checked out", record))
}
