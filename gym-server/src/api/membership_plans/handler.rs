//! Membership Plan API Handlers

use axum::{extract::State, http::StatusCode};
use shared::models::{MembershipPlan, MembershipPlanCreate};

use crate::core::ServerState;
use crate::db::repository::membership;
use crate::utils::money::validate_amount;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{ApiJson, ApiResponse, AppError, AppResult};

/// GET /api/membership-plans - plans on sale
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<MembershipPlan>>> {
    let plans = membership::find_all_plans(state.pool()).await?;
    Ok(ApiResponse::success(plans))
}

/// POST /api/membership-plans
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<MembershipPlanCreate>,
) -> AppResult<(StatusCode, ApiResponse<MembershipPlan>)> {
    validate_required_text(&payload.plan_name, "plan_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_amount(payload.price, "price")?;
    if payload.duration_days <= 0 {
        return Err(AppError::validation("duration_days must be positive")
            .with_detail("field", "duration_days"));
    }

    let plan = membership::create_plan(state.pool(), &payload).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(plan)))
}
