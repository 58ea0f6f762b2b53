//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{RoleInfo, User, UserCreate, UserUpdate};
use sqlx::SqlitePool;

const USER_SELECT: &str = "SELECT u.user_id, u.role_id, r.role_name, u.full_name, u.email, u.phone, u.password_hash, u.is_active, u.last_login, u.created_at, u.updated_at FROM users u JOIN roles r ON u.role_id = r.role_id";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} WHERE u.is_deleted = 0 ORDER BY u.created_at DESC, u.user_id DESC");
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE u.user_id = ? AND u.is_deleted = 0");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Lookup by normalized email
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE u.email = ? AND u.is_deleted = 0");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_deleted = 0")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn find_role(pool: &SqlitePool, role_id: i64) -> RepoResult<Option<RoleInfo>> {
    let row = sqlx::query_as::<_, RoleInfo>(
        "SELECT role_id, role_name, description FROM roles WHERE role_id = ?",
    )
    .bind(role_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert a user; `data.email` must already be normalized and `data.role_id` set
pub async fn create(
    pool: &SqlitePool,
    data: &UserCreate,
    password_hash: &str,
    created_by: Option<i64>,
) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let id = sqlx::query(
        "INSERT INTO users (role_id, full_name, email, phone, password_hash, is_active, created_by, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7, ?7)",
    )
    .bind(data.role_id)
    .bind(&data.full_name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(password_hash)
    .bind(created_by)
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Returns `None` when the user does not exist
pub async fn update(pool: &SqlitePool, id: i64, data: &UserUpdate) -> RepoResult<Option<User>> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE users SET full_name = COALESCE(?1, full_name), phone = COALESCE(?2, phone), role_id = COALESCE(?3, role_id), is_active = COALESCE(?4, is_active), updated_at = ?5 WHERE user_id = ?6 AND is_deleted = 0",
    )
    .bind(&data.full_name)
    .bind(&data.phone)
    .bind(data.role_id)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

pub async fn touch_last_login(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE users SET last_login = ?1 WHERE user_id = ?2")
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Soft delete, also deactivates the account
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE users SET is_deleted = 1, is_active = 0, updated_at = ? WHERE user_id = ? AND is_deleted = 0",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;

    fn staff(email: &str) -> UserCreate {
        UserCreate {
            full_name: "Desk".into(),
            email: email.into(),
            password: String::new(),
            phone: None,
            role_id: Some(2),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let (pool, _dir) = test_pool().await;
        let user = create(&pool, &staff("desk@gym.test"), "hash", None).await.unwrap();
        assert_eq!(user.role_name, "staff");
        assert!(user.is_active);

        let found = find_by_email(&pool, "desk@gym.test").await.unwrap().unwrap();
        assert_eq!(found.user_id, user.user_id);
        assert_eq!(count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_duplicate_error() {
        let (pool, _dir) = test_pool().await;
        create(&pool, &staff("a@gym.test"), "hash", None).await.unwrap();
        let err = create(&pool, &staff("a@gym.test"), "hash", None).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_soft_delete_frees_email() {
        let (pool, _dir) = test_pool().await;
        let user = create(&pool, &staff("a@gym.test"), "hash", None).await.unwrap();
        assert!(delete(&pool, user.user_id).await.unwrap());
        assert!(!delete(&pool, user.user_id).await.unwrap());
        assert!(find_by_id(&pool, user.user_id).await.unwrap().is_none());

        let deleted: i64 = sqlx::query_scalar("SELECT is_deleted FROM users WHERE user_id = ?")
            .bind(user.user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(deleted, 1);

        create(&pool, &staff("a@gym.test"), "hash", None).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let (pool, _dir) = test_pool().await;
        let result = update(&pool, 404, &UserUpdate::default()).await.unwrap();
        assert!(result.is_none());
    }
}
