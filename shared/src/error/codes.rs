//! Unified error codes for the gym management API
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Customer and membership errors
//! - 4xxx: Order errors
//! - 5xxx: Billing errors
//! - 6xxx: Product and stock errors
//! - 7xxx: Gym activity and schedule errors
//! - 8xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a plain `u16` so clients can switch on it without string parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format (dates, times, JSON bodies)
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,
    /// Users cannot delete their own account
    CannotDeleteSelf = 2003,

    // ==================== 3xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 3001,
    /// Membership plan not found
    MembershipPlanNotFound = 3002,
    /// Attendance record not found
    AttendanceNotFound = 3003,
    /// Attendance record has already been checked out
    AlreadyCheckedOut = 3004,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Item quantity must be positive
    InvalidQuantity = 4003,
    /// Amount is negative or not a finite number
    InvalidAmount = 4004,

    // ==================== 5xxx: Billing ====================
    /// Invoice not found
    InvoiceNotFound = 5001,
    /// Invoice amount could not be determined
    InvoiceAmountRequired = 5002,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Category not found
    CategoryNotFound = 6002,
    /// Not enough stock to satisfy the request
    InsufficientStock = 6003,
    /// SKU already used by another product
    SkuExists = 6004,
    /// Category name already exists
    CategoryNameExists = 6005,

    // ==================== 7xxx: Gym ====================
    /// Gym activity not found
    ActivityNotFound = 7001,
    /// Schedule not found
    ScheduleNotFound = 7002,
    /// Trainer not found
    TrainerNotFound = 7003,
    /// Enrollment not found
    EnrollmentNotFound = 7004,
    /// Customer is already enrolled in the schedule
    AlreadyEnrolled = 7005,
    /// Schedule has reached its capacity
    ScheduleFull = 7006,
    /// Schedule has been cancelled
    ScheduleCancelled = 7007,
    /// Schedule end time is not after its start time
    InvalidTimeRange = 7008,

    // ==================== 8xxx: User ====================
    /// User not found
    UserNotFound = 8001,
    /// Email already registered
    EmailExists = 8002,
    /// Password too short
    PasswordTooShort = 8003,
    /// Unknown role id
    RoleNotFound = 8004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Invalid token",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Admin role required",
            ErrorCode::CannotDeleteSelf => "You cannot delete your own account",

            // Customer
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::MembershipPlanNotFound => "Membership plan not found",
            ErrorCode::AttendanceNotFound => "Attendance record not found",
            ErrorCode::AlreadyCheckedOut => "Attendance record is already checked out",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::InvalidQuantity => "Quantity must be greater than zero",
            ErrorCode::InvalidAmount => "Amount must be a non-negative number",

            // Billing
            ErrorCode::InvoiceNotFound => "Invoice not found",
            ErrorCode::InvoiceAmountRequired => "Invoice amount is required",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::InsufficientStock => "Insufficient stock",
            ErrorCode::SkuExists => "SKU already exists",
            ErrorCode::CategoryNameExists => "Category name already exists",

            // Gym
            ErrorCode::ActivityNotFound => "Gym activity not found",
            ErrorCode::ScheduleNotFound => "Schedule not found",
            ErrorCode::TrainerNotFound => "Trainer not found",
            ErrorCode::EnrollmentNotFound => "Enrollment not found",
            ErrorCode::AlreadyEnrolled => "Customer is already enrolled in this schedule",
            ErrorCode::ScheduleFull => "Schedule is full",
            ErrorCode::ScheduleCancelled => "Schedule has been cancelled",
            ErrorCode::InvalidTimeRange => "End time must be after start time",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::EmailExists => "Email already registered",
            ErrorCode::PasswordTooShort => "Password is too short",
            ErrorCode::RoleNotFound => "Role not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when converting an unknown numeric value into [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            5 => ErrorCode::InvalidRequest,
            6 => ErrorCode::InvalidFormat,
            7 => ErrorCode::RequiredField,
            8 => ErrorCode::ValueOutOfRange,

            1001 => ErrorCode::NotAuthenticated,
            1002 => ErrorCode::InvalidCredentials,
            1003 => ErrorCode::TokenExpired,
            1004 => ErrorCode::TokenInvalid,
            1005 => ErrorCode::AccountDisabled,

            2001 => ErrorCode::PermissionDenied,
            2002 => ErrorCode::AdminRequired,
            2003 => ErrorCode::CannotDeleteSelf,

            3001 => ErrorCode::CustomerNotFound,
            3002 => ErrorCode::MembershipPlanNotFound,
            3003 => ErrorCode::AttendanceNotFound,
            3004 => ErrorCode::AlreadyCheckedOut,

            4001 => ErrorCode::OrderNotFound,
            4002 => ErrorCode::OrderEmpty,
            4003 => ErrorCode::InvalidQuantity,
            4004 => ErrorCode::InvalidAmount,

            5001 => ErrorCode::InvoiceNotFound,
            5002 => ErrorCode::InvoiceAmountRequired,

            6001 => ErrorCode::ProductNotFound,
            6002 => ErrorCode::CategoryNotFound,
            6003 => ErrorCode::InsufficientStock,
            6004 => ErrorCode::SkuExists,
            6005 => ErrorCode::CategoryNameExists,

            7001 => ErrorCode::ActivityNotFound,
            7002 => ErrorCode::ScheduleNotFound,
            7003 => ErrorCode::TrainerNotFound,
            7004 => ErrorCode::EnrollmentNotFound,
            7005 => ErrorCode::AlreadyEnrolled,
            7006 => ErrorCode::ScheduleFull,
            7007 => ErrorCode::ScheduleCancelled,
            7008 => ErrorCode::InvalidTimeRange,

            8001 => ErrorCode::UserNotFound,
            8002 => ErrorCode::EmailExists,
            8003 => ErrorCode::PasswordTooShort,
            8004 => ErrorCode::RoleNotFound,

            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,
            9003 => ErrorCode::ConfigError,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::InsufficientStock.code(), 6003);
        assert_eq!(ErrorCode::AlreadyEnrolled.code(), 7005);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderEmpty).unwrap();
        assert_eq!(json, "4002");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("7005").unwrap();
        assert_eq!(code, ErrorCode::AlreadyEnrolled);

        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::ValueOutOfRange,
            ErrorCode::AccountDisabled,
            ErrorCode::CannotDeleteSelf,
            ErrorCode::AlreadyCheckedOut,
            ErrorCode::InvalidAmount,
            ErrorCode::InvoiceAmountRequired,
            ErrorCode::CategoryNameExists,
            ErrorCode::InvalidTimeRange,
            ErrorCode::RoleNotFound,
            ErrorCode::ConfigError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(ErrorCode::InsufficientStock.message(), "Insufficient stock");
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
