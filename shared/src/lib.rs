//! Shared types for the gym management server
//!
//! Domain models, the unified error system and the response envelope used by
//! every HTTP handler.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
