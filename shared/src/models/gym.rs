//! Gym Activity Models
//!
//! Activity (class template) → Schedule (dated occurrence) → Enrollment (customer seat).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    #[default]
    Group,
    Personal,
}

/// Gym activity (class template)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct GymActivity {
    pub activity_id: i64,
    pub activity_name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub duration_mins: i64,
    pub max_capacity: i64,
    pub activity_type: ActivityType,
    pub trainer_id: Option<i64>,
    pub trainer_name: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GymActivityCreate {
    pub activity_name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub duration_mins: Option<i64>,
    pub max_capacity: Option<i64>,
    pub activity_type: Option<ActivityType>,
    pub trainer_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GymActivityUpdate {
    pub activity_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub duration_mins: Option<i64>,
    pub max_capacity: Option<i64>,
    pub activity_type: Option<ActivityType>,
    pub trainer_id: Option<i64>,
    pub is_active: Option<bool>,
}

/// Trainer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Trainer {
    pub trainer_id: i64,
    pub full_name: String,
    pub specialization: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainerCreate {
    pub full_name: String,
    pub specialization: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

/// Dated occurrence of an activity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Schedule {
    pub schedule_id: i64,
    pub activity_id: i64,
    pub activity_name: String,
    pub trainer_id: Option<i64>,
    pub trainer_name: Option<String>,
    /// `YYYY-MM-DD`
    pub schedule_date: String,
    /// `HH:MM`
    pub start_time: String,
    pub end_time: String,
    pub max_capacity: i64,
    /// Number of non-cancelled enrollments
    pub enrolled_count: i64,
    pub room: Option<String>,
    pub status: ScheduleStatus,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleCreate {
    pub activity_id: i64,
    pub schedule_date: String,
    pub start_time: String,
    pub end_time: String,
    pub trainer_id: Option<i64>,
    /// Defaults to the activity's capacity
    pub max_capacity: Option<i64>,
    pub room: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleUpdate {
    pub trainer_id: Option<i64>,
    pub schedule_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub max_capacity: Option<i64>,
    pub room: Option<String>,
    pub status: Option<ScheduleStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum AttendanceMark {
    #[default]
    Pending,
    Present,
    Absent,
}

/// Customer seat in a schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Enrollment {
    pub enrollment_id: i64,
    pub schedule_id: i64,
    pub customer_id: i64,
    pub full_name: String,
    pub phone: String,
    pub attendance: AttendanceMark,
    pub enrolled_at: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnrollRequest {
    pub customer_id: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttendanceUpdate {
    pub attendance: AttendanceMark,
}
