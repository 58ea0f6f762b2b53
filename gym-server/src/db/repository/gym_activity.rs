//! Gym Activity Repository

use super::{RepoError, RepoResult, trainer};
use shared::ErrorCode;
use shared::models::{GymActivity, GymActivityCreate, GymActivityUpdate};
use sqlx::SqlitePool;

const ACTIVITY_SELECT: &str = "SELECT a.activity_id, a.activity_name, a.category, a.description, a.duration_mins, a.max_capacity, a.activity_type, a.trainer_id, t.full_name AS trainer_name, a.is_active, a.created_at, a.updated_at FROM gym_activities a LEFT JOIN trainers t ON a.trainer_id = t.trainer_id";

pub const DEFAULT_DURATION_MINS: i64 = 60;
pub const DEFAULT_MAX_CAPACITY: i64 = 20;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<GymActivity>> {
    let sql = format!("{ACTIVITY_SELECT} WHERE a.is_deleted = 0 ORDER BY a.activity_name, a.activity_id");
    let rows = sqlx::query_as::<_, GymActivity>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<GymActivity>> {
    let sql = format!("{ACTIVITY_SELECT} WHERE a.activity_id = ? AND a.is_deleted = 0");
    let row = sqlx::query_as::<_, GymActivity>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub(crate) async fn ensure_trainer(pool: &SqlitePool, trainer_id: Option<i64>) -> RepoResult<()> {
    if let Some(id) = trainer_id
        && trainer::find_by_id(pool, id).await?.is_none()
    {
        return Err(RepoError::business(ErrorCode::TrainerNotFound));
    }
    Ok(())
}

pub async fn create(
    pool: &SqlitePool,
    data: &GymActivityCreate,
    created_by: Option<i64>,
) -> RepoResult<GymActivity> {
    ensure_trainer(pool, data.trainer_id).await?;

    let now = shared::util::now_millis();
    let id = sqlx::query(
        "INSERT INTO gym_activities (activity_name, category, description, duration_mins, max_capacity, activity_type, trainer_id, is_active, created_by, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?9, ?9)",
    )
    .bind(data.activity_name.trim())
    .bind(&data.category)
    .bind(&data.description)
    .bind(data.duration_mins.unwrap_or(DEFAULT_DURATION_MINS))
    .bind(data.max_capacity.unwrap_or(DEFAULT_MAX_CAPACITY))
    .bind(data.activity_type.unwrap_or_default())
    .bind(data.trainer_id)
    .bind(created_by)
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create activity".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: &GymActivityUpdate,
) -> RepoResult<Option<GymActivity>> {
    ensure_trainer(pool, data.trainer_id).await?;

    let rows = sqlx::query(
        "UPDATE gym_activities SET activity_name = COALESCE(?1, activity_name), category = COALESCE(?2, category), description = COALESCE(?3, description), duration_mins = COALESCE(?4, duration_mins), max_capacity = COALESCE(?5, max_capacity), activity_type = COALESCE(?6, activity_type), trainer_id = COALESCE(?7, trainer_id), is_active = COALESCE(?8, is_active), updated_at = ?9 WHERE activity_id = ?10 AND is_deleted = 0",
    )
    .bind(&data.activity_name)
    .bind(&data.category)
    .bind(&data.description)
    .bind(data.duration_mins)
    .bind(data.max_capacity)
    .bind(data.activity_type)
    .bind(data.trainer_id)
    .bind(data.is_active)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

/// Soft delete; existing schedules keep their rows
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE gym_activities SET is_deleted = 1, is_active = 0, updated_at = ? WHERE activity_id = ? AND is_deleted = 0",
    )
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;
    use shared::models::{ActivityType, TrainerCreate};

    #[tokio::test]
    async fn test_create_defaults_and_trainer_join() {
        let (pool, _dir) = test_pool().await;
        let coach = trainer::create(
            &pool,
            &TrainerCreate {
                full_name: "Dana".into(),
                specialization: Some("Yoga".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let activity = create(
            &pool,
            &GymActivityCreate {
                activity_name: "Morning Yoga".into(),
                trainer_id: Some(coach.trainer_id),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

        assert_eq!(activity.max_capacity, DEFAULT_MAX_CAPACITY);
        assert_eq!(activity.duration_mins, DEFAULT_DURATION_MINS);
        assert_eq!(activity.activity_type, ActivityType::Group);
        assert_eq!(activity.trainer_name.as_deref(), Some("Dana"));
    }

    #[tokio::test]
    async fn test_unknown_trainer_rejected() {
        let (pool, _dir) = test_pool().await;
        let err = create(
            &pool,
            &GymActivityCreate {
                activity_name: "Spin".into(),
                trainer_id: Some(12),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::TrainerNotFound, _)));
    }
}
