//! Trainer Repository

use super::{RepoError, RepoResult};
use shared::models::{Trainer, TrainerCreate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Trainer>> {
    let rows = sqlx::query_as::<_, Trainer>(
        "SELECT trainer_id, full_name, specialization, phone, email, is_active FROM trainers WHERE is_deleted = 0 AND is_active = 1 ORDER BY full_name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Trainer>> {
    let row = sqlx::query_as::<_, Trainer>(
        "SELECT trainer_id, full_name, specialization, phone, email, is_active FROM trainers WHERE trainer_id = ? AND is_deleted = 0",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: &TrainerCreate) -> RepoResult<Trainer> {
    let id = sqlx::query(
        "INSERT INTO trainers (full_name, specialization, phone, email, is_active, created_at) VALUES (?1, ?2, ?3, ?4, 1, ?5)",
    )
    .bind(data.full_name.trim())
    .bind(&data.specialization)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create trainer".into()))
}
