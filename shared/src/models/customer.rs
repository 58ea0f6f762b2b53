//! Customer Model

use serde::{Deserialize, Serialize};

/// Membership classification shown on the customer card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum MembershipType {
    #[default]
    Basic,
    Premium,
    Vip,
}

/// Customer entity, joined with the currently active membership (if any)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub customer_id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub works: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub membership_type: MembershipType,
    pub joined_date: String,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    // Active membership
    pub plan_id: Option<i64>,
    pub plan_name: Option<String>,
    pub membership_start: Option<String>,
    pub membership_end: Option<String>,
    pub membership_status: Option<String>,
    pub days_remaining: Option<i64>,
}

/// Create customer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerCreate {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub works: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub membership_type: Option<MembershipType>,
}

/// Update customer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub works: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub membership_type: Option<MembershipType>,
    pub is_active: Option<bool>,
}

/// Membership plan (catalogue entry)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MembershipPlan {
    pub plan_id: i64,
    pub plan_name: String,
    pub description: Option<String>,
    pub duration_days: i64,
    pub price: f64,
    pub is_active: bool,
    pub created_at: i64,
}

/// Create membership plan payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipPlanCreate {
    pub plan_name: String,
    pub description: Option<String>,
    pub duration_days: i64,
    pub price: f64,
}

/// A plan assigned to a customer for a date range
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Membership {
    pub membership_id: i64,
    pub customer_id: i64,
    pub plan_id: i64,
    pub plan_name: String,
    pub price: f64,
    pub start_date: String,
    pub end_date: String,
    /// active | expired
    pub status: String,
    pub assigned_by: Option<i64>,
    pub assigned_by_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
}

/// Assign membership payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipAssign {
    pub plan_id: i64,
    pub start_date: String,
    pub notes: Option<String>,
}

/// Gym floor check-in / check-out record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Attendance {
    pub attendance_id: i64,
    pub customer_id: i64,
    pub check_in: i64,
    pub check_out: Option<i64>,
    pub created_by: Option<i64>,
}
