//! Gym Activity API Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveTime;
use shared::models::{
    AttendanceUpdate, EnrollRequest, Enrollment, GymActivity, GymActivityCreate,
    GymActivityUpdate, Schedule, ScheduleCreate, ScheduleUpdate, Trainer, TrainerCreate,
};

use crate::api::Created;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{gym_activity, schedule, trainer};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, parse_date, parse_time,
    validate_optional_text, validate_required_text,
};
use crate::utils::{ApiJson, ApiResponse, AppError, AppResult, ErrorCode};

fn activity_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::ActivityNotFound).with_detail("activity_id", id)
}

fn schedule_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::ScheduleNotFound).with_detail("schedule_id", id)
}

fn enrollment_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::EnrollmentNotFound).with_detail("enrollment_id", id)
}

fn positive(value: Option<i64>, field: &str) -> AppResult<()> {
    match value {
        Some(v) if v <= 0 => Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be positive"),
        )
        .with_detail("field", field)),
        _ => Ok(()),
    }
}

/// `end` must be strictly after `start`
fn check_time_range(start: NaiveTime, end: NaiveTime) -> AppResult<()> {
    if end <= start {
        return Err(AppError::new(ErrorCode::InvalidTimeRange));
    }
    Ok(())
}

// ── Activities ──────────────────────────────────────────────────────

/// GET /api/gym-activities
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<GymActivity>>> {
    let activities = gym_activity::find_all(state.pool()).await?;
    Ok(ApiResponse::success(activities))
}

/// GET /api/gym-activities/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<GymActivity>> {
    let activity = gym_activity::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| activity_not_found(id))?;
    Ok(ApiResponse::success(activity))
}

/// POST /api/gym-activities
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    ApiJson(payload): ApiJson<GymActivityCreate>,
) -> AppResult<(StatusCode, ApiResponse<GymActivity>)> {
    validate_required_text(&payload.activity_name, "activity_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    positive(payload.duration_mins, "duration_mins")?;
    positive(payload.max_capacity, "max_capacity")?;

    let created = gym_activity::create(state.pool(), &payload, Some(current.id)).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(created)))
}

/// PUT /api/gym-activities/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<GymActivityUpdate>,
) -> AppResult<ApiResponse<GymActivity>> {
    if let Some(name) = &payload.activity_name {
        validate_required_text(name, "activity_name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    positive(payload.duration_mins, "duration_mins")?;
    positive(payload.max_capacity, "max_capacity")?;

    let updated = gym_activity::update(state.pool(), id, &payload)
        .await?
        .ok_or_else(|| activity_not_found(id))?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/gym-activities/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    if !gym_activity::delete(state.pool(), id).await? {
        return Err(activity_not_found(id));
    }
    Ok(ApiResponse::ok("Activity deleted"))
}

// ── Trainers ────────────────────────────────────────────────────────

/// GET /api/gym-activities/trainers
pub async fn list_trainers(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Trainer>>> {
    let trainers = trainer::find_all(state.pool()).await?;
    Ok(ApiResponse::success(trainers))
}

/// POST /api/gym-activities/trainers
pub async fn create_trainer(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<TrainerCreate>,
) -> AppResult<(StatusCode, ApiResponse<Trainer>)> {
    validate_required_text(&payload.full_name, "full_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.specialization, "specialization", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;

    let created = trainer::create(state.pool(), &payload).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(created)))
}

// ── Schedules ───────────────────────────────────────────────────────

/// GET /api/gym-activities/schedules
pub async fn list_schedules(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Schedule>>> {
    let schedules = schedule::find_all(state.pool()).await?;
    Ok(ApiResponse::success(schedules))
}

/// GET /api/gym-activities/schedules/{id}
pub async fn get_schedule(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Schedule>> {
    let found = schedule::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| schedule_not_found(id))?;
    Ok(ApiResponse::success(found))
}

/// POST /api/gym-activities/schedules
pub async fn create_schedule(
    State(state): State<ServerState>,
    current: CurrentUser,
    ApiJson(payload): ApiJson<ScheduleCreate>,
) -> AppResult<(StatusCode, ApiResponse<Schedule>)> {
    parse_date(&payload.schedule_date, "schedule_date")?;
    let start = parse_time(&payload.start_time, "start_time")?;
    let end = parse_time(&payload.end_time, "end_time")?;
    check_time_range(start, end)?;
    positive(payload.max_capacity, "max_capacity")?;
    validate_optional_text(&payload.room, "room", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let created = schedule::create(state.pool(), &payload, Some(current.id)).await?;
    tracing::info!(
        schedule_id = created.schedule_id,
        activity_id = created.activity_id,
        date = %created.schedule_date,
        "Schedule created"
    );
    Ok((StatusCode::CREATED, ApiResponse::success(created)))
}

/// PUT /api/gym-activities/schedules/{id}
///
/// The time range is checked on the merged values
pub async fn update_schedule(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<ScheduleUpdate>,
) -> AppResult<ApiResponse<Schedule>> {
    let pool = state.pool();
    let existing = schedule::find_by_id(pool, id)
        .await?
        .ok_or_else(|| schedule_not_found(id))?;

    if let Some(date) = &payload.schedule_date {
        parse_date(date, "schedule_date")?;
    }
    let start = parse_time(
        payload.start_time.as_deref().unwrap_or(&existing.start_time),
        "start_time",
    )?;
    let end = parse_time(
        payload.end_time.as_deref().unwrap_or(&existing.end_time),
        "end_time",
    )?;
    check_time_range(start, end)?;
    positive(payload.max_capacity, "max_capacity")?;
    validate_optional_text(&payload.room, "room", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let updated = schedule::update(pool, id, &payload)
        .await?
        .ok_or_else(|| schedule_not_found(id))?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/gym-activities/schedules/{id}
pub async fn delete_schedule(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    if !schedule::delete(state.pool(), id).await? {
        return Err(schedule_not_found(id));
    }
    Ok(ApiResponse::ok("Schedule deleted"))
}

// ── Enrollments ─────────────────────────────────────────────────────

/// GET /api/gym-activities/schedules/{id}/enrollments
pub async fn list_enrollments(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Vec<Enrollment>>> {
    let pool = state.pool();
    if schedule::find_by_id(pool, id).await?.is_none() {
        return Err(schedule_not_found(id));
    }
    let enrollments = schedule::find_enrollments(pool, id).await?;
    Ok(ApiResponse::success(enrollments))
}

/// POST /api/gym-activities/schedules/{id}/enroll
pub async fn enroll(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<EnrollRequest>,
) -> AppResult<(StatusCode, ApiResponse<Created>)> {
    let enrollment_id =
        schedule::enroll(state.pool(), id, payload.customer_id, Some(current.id)).await?;
    tracing::info!(
        schedule_id = id,
        customer_id = payload.customer_id,
        enrollment_id,
        "Customer enrolled"
    );
    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("Enrolled", Created { id: enrollment_id }),
    ))
}

/// DELETE /api/gym-activities/enrollments/{id} - cancel and free the seat
pub async fn cancel_enrollment(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    if !schedule::cancel_enrollment(state.pool(), id).await? {
        return Err(enrollment_not_found(id));
    }
    tracing::info!(enrollment_id = id, "Enrollment cancelled");
    Ok(ApiResponse::ok("Enrollment cancelled"))
}

/// PATCH /api/gym-activities/enrollments/{id}/attendance
pub async fn mark_attendance(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<AttendanceUpdate>,
) -> AppResult<ApiResponse<Enrollment>> {
    let updated = schedule::set_attendance(state.pool(), id, payload.attendance)
        .await?
        .ok_or_else(|| enrollment_not_found(id))?;
    Ok(ApiResponse::success(updated))
}
