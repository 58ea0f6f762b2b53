//! Data models
//!
//! Shared between the server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are epoch millis,
//! calendar dates are `YYYY-MM-DD` strings.

pub mod billing;
pub mod customer;
pub mod gym;
pub mod order;
pub mod product;
pub mod report;
pub mod role;
pub mod user;

// Re-exports
pub use billing::*;
pub use customer::*;
pub use gym::*;
pub use order::*;
pub use product::*;
pub use report::*;
pub use role::*;
pub use user::*;
