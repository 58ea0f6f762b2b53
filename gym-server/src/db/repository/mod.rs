//! Repository Module
//!
//! Free functions over `&SqlitePool` (or an open transaction), one file per table group.
//! Every default query filters `is_deleted = 0`; deletes are soft.

pub mod attendance;
pub mod billing;
pub mod customer;
pub mod gym_activity;
pub mod membership;
pub mod order;
pub mod product;
pub mod report;
pub mod schedule;
pub mod trainer;
pub mod user;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
///
/// Missing rows are not errors here: lookups return `Option`, updates and
/// deletes report whether a row was touched.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Domain rule violation carrying its own error code
    #[error("{1}")]
    Business(ErrorCode, String),
}

impl RepoError {
    pub fn business(code: ErrorCode) -> Self {
        RepoError::Business(code, code.message().to_string())
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return RepoError::Duplicate(db_err.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::InsufficientStock(msg) => {
                AppError::with_message(ErrorCode::InsufficientStock, msg)
            }
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                AppError::database(msg)
            }
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Business(code, msg) => AppError::with_message(code, msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
