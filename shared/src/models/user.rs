//! User Model

use serde::{Deserialize, Serialize};

/// Staff account (joined with its role name)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub user_id: i64,
    pub role_id: i64,
    pub role_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Argon2 PHC string, never serialized
    #[serde(skip)]
    pub password_hash: String,
    pub is_active: bool,
    pub last_login: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Register user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role_id: Option<i64>,
}

/// Update user payload (admin)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role_id: Option<i64>,
    pub is_active: Option<bool>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}
