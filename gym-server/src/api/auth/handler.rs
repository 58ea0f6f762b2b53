//! Authentication Handlers
//!
//! Login never tells an unknown email, a wrong password and a disabled
//! account apart.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{LoginRequest, LoginResponse, Role, User, UserCreate, UserUpdate};

use crate::api::Created;
use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::repository::{RepoError, user};
use crate::security_log;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, MIN_PASSWORD_LEN,
    normalize_email, validate_optional_text, validate_required_text,
};
use crate::utils::{ApiJson, ApiResponse, AppError, AppResult, ErrorCode};

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let email = normalize_email(&req.email);
    let pool = state.pool();

    let found = user::find_by_email(pool, &email).await?;

    let account = match found {
        Some(u) if u.is_active && verify_password(&req.password, &u.password_hash) => u,
        Some(u) => {
            let reason = if u.is_active {
                "invalid_password"
            } else {
                "account_disabled"
            };
            security_log!("WARN", "login_failed", email = email.clone(), reason = reason);
            return Err(AppError::invalid_credentials());
        }
        None => {
            security_log!(
                "WARN",
                "login_failed",
                email = email.clone(),
                reason = "user_not_found"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    let role = Role::from_id(account.role_id).ok_or_else(|| {
        AppError::internal(format!(
            "User {} has unknown role id {}",
            account.user_id, account.role_id
        ))
    })?;

    let token = state
        .get_jwt_service()
        .generate_token(account.user_id, &account.email, &account.full_name, role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    user::touch_last_login(pool, account.user_id).await?;

    security_log!(
        "INFO",
        "login_success",
        user_id = account.user_id,
        email = account.email.clone(),
        role = role.name()
    );

    Ok(ApiResponse::success_with_message(
        "Login successful",
        LoginResponse {
            token,
            user: account,
        },
    ))
}

/// GET /api/auth/profile
pub async fn profile(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<ApiResponse<User>> {
    let account = user::find_by_id(state.pool(), current.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(ApiResponse::success(account))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<ServerState>,
    current: CurrentUser,
    ApiJson(mut payload): ApiJson<UserCreate>,
) -> AppResult<(StatusCode, ApiResponse<Created>)> {
    validate_required_text(&payload.full_name, "full_name", MAX_NAME_LEN)?;
    validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    if payload.password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN})"
        )));
    }

    let pool = state.pool();
    let role_id = payload.role_id.unwrap_or(Role::DEFAULT.id());
    if user::find_role(pool, role_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::RoleNotFound).with_detail("role_id", role_id));
    }

    payload.email = normalize_email(&payload.email);
    payload.full_name = payload.full_name.trim().to_string();
    payload.role_id = Some(role_id);

    let hash = hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let created = user::create(pool, &payload, &hash, Some(current.id))
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::EmailExists),
            other => other.into(),
        })?;

    security_log!(
        "INFO",
        "user_registered",
        user_id = created.user_id,
        email = created.email.clone(),
        role_id = role_id,
        by = current.id
    );

    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("User registered", Created { id: created.user_id }),
    ))
}

/// GET /api/auth/users
pub async fn list_users(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<User>>> {
    let users = user::find_all(state.pool()).await?;
    Ok(ApiResponse::success(users))
}

/// PUT /api/auth/users/{id}
pub async fn update_user(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<UserUpdate>,
) -> AppResult<ApiResponse<User>> {
    if let Some(name) = &payload.full_name {
        validate_required_text(name, "full_name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let pool = state.pool();
    if let Some(role_id) = payload.role_id
        && user::find_role(pool, role_id).await?.is_none()
    {
        return Err(AppError::new(ErrorCode::RoleNotFound).with_detail("role_id", role_id));
    }

    let updated = user::update(pool, id, &payload)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_detail("user_id", id))?;

    security_log!(
        "INFO",
        "user_updated",
        user_id = id,
        role_id = updated.role_id,
        is_active = updated.is_active,
        by = current.id
    );

    Ok(ApiResponse::success(updated))
}

/// DELETE /api/auth/users/{id}
pub async fn delete_user(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    if id == current.id {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }

    if !user::delete(state.pool(), id).await? {
        return Err(AppError::new(ErrorCode::UserNotFound).with_detail("user_id", id));
    }

    security_log!("INFO", "user_deleted", user_id = id, by = current.id);

    Ok(ApiResponse::ok("User deleted"))
}
