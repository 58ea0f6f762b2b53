//! Attendance Repository (gym floor check-in / check-out)

use super::{RepoError, RepoResult};
use shared::ErrorCode;
use shared::models::Attendance;
use sqlx::SqlitePool;

/// Rows returned by the customer attendance history
pub const HISTORY_LIMIT: i64 = 30;

pub async fn find_by_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<Vec<Attendance>> {
    let rows = sqlx::query_as::<_, Attendance>(
        "SELECT attendance_id, customer_id, check_in, check_out, created_by FROM attendance WHERE customer_id = ? AND is_deleted = 0 ORDER BY check_in DESC, attendance_id DESC LIMIT ?",
    )
    .bind(customer_id)
    .bind(HISTORY_LIMIT)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Attendance>> {
    let row = sqlx::query_as::<_, Attendance>(
        "SELECT attendance_id, customer_id, check_in, check_out, created_by FROM attendance WHERE attendance_id = ? AND is_deleted = 0",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn check_in(
    pool: &SqlitePool,
    customer_id: i64,
    created_by: Option<i64>,
) -> RepoResult<Attendance> {
    let id = sqlx::query(
        "INSERT INTO attendance (customer_id, check_in, created_by) VALUES (?1, ?2, ?3)",
    )
    .bind(customer_id)
    .bind(shared::util::now_millis())
    .bind(created_by)
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to record check-in".into()))
}

/// Close an open check-in
pub async fn check_out(pool: &SqlitePool, attendance_id: i64) -> RepoResult<Attendance> {
    let rows = sqlx::query(
        "UPDATE attendance SET check_out = ?1 WHERE attendance_id = ?2 AND check_out IS NULL AND is_deleted = 0",
    )
    .bind(shared::util::now_millis())
    .bind(attendance_id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return match find_by_id(pool, attendance_id).await? {
            Some(_) => Err(RepoError::business(ErrorCode::AlreadyCheckedOut)),
            None => Err(RepoError::business(ErrorCode::AttendanceNotFound)),
        };
    }

    find_by_id(pool, attendance_id)
        .await?
        .ok_or_else(|| RepoError::business(ErrorCode::AttendanceNotFound))
}
