//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use super::types::AppError;
use axum::extract::rejection::JsonRejection;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::CustomerNotFound
            | Self::MembershipPlanNotFound
            | Self::AttendanceNotFound
            | Self::OrderNotFound
            | Self::InvoiceNotFound
            | Self::ProductNotFound
            | Self::CategoryNotFound
            | Self::ActivityNotFound
            | Self::ScheduleNotFound
            | Self::TrainerNotFound
            | Self::EnrollmentNotFound
            | Self::UserNotFound
            | Self::RoleNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::AlreadyCheckedOut
            | Self::InsufficientStock
            | Self::SkuExists
            | Self::CategoryNameExists
            | Self::AlreadyEnrolled
            | Self::ScheduleFull
            | Self::EmailExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::AdminRequired | Self::CannotDeleteSelf => {
                StatusCode::FORBIDDEN
            }

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Whether the status is a success status
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Malformed or missing JSON bodies surface as validation errors in the envelope
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::with_message(ErrorCode::InvalidFormat, rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_codes() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::ProductNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::ScheduleNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_codes() {
        assert_eq!(ErrorCode::AlreadyEnrolled.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::InsufficientStock.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::EmailExists.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_auth_and_permission_codes() {
        assert_eq!(ErrorCode::NotAuthenticated.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::TokenExpired.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::PermissionDenied.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_validation_defaults_to_bad_request() {
        assert_eq!(ErrorCode::ValidationFailed.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::OrderEmpty.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidFormat.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::ScheduleCancelled.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_system_codes() {
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
