//! Customer Repository

use super::{RepoError, RepoResult};
use shared::models::{Customer, CustomerCreate, CustomerUpdate};
use sqlx::SqlitePool;

/// Customer joined with its newest active membership
const CUSTOMER_SELECT: &str = "SELECT c.customer_id, c.full_name, c.email, c.phone, c.date_of_birth, c.gender, c.address, c.works, c.emergency_contact_name, c.emergency_contact_phone, c.membership_type, c.joined_date, c.is_active, c.created_by, c.created_at, c.updated_at, m.plan_id, p.plan_name, m.start_date AS membership_start, m.end_date AS membership_end, m.status AS membership_status, CAST(julianday(m.end_date) - julianday(date('now')) AS INTEGER) AS days_remaining FROM customers c LEFT JOIN customer_memberships m ON m.membership_id = (SELECT cm.membership_id FROM customer_memberships cm WHERE cm.customer_id = c.customer_id AND cm.status = 'active' AND cm.is_deleted = 0 ORDER BY cm.end_date DESC LIMIT 1) LEFT JOIN membership_plans p ON p.plan_id = m.plan_id";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE c.is_deleted = 0 ORDER BY c.created_at DESC, c.customer_id DESC");
    let rows = sqlx::query_as::<_, Customer>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE c.customer_id = ? AND c.is_deleted = 0");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Cheap existence check for foreign references
pub async fn exists(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT customer_id FROM customers WHERE customer_id = ? AND is_deleted = 0")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}

pub async fn create(
    pool: &SqlitePool,
    data: &CustomerCreate,
    created_by: Option<i64>,
) -> RepoResult<Customer> {
    let now = shared::util::now_millis();
    let id = sqlx::query(
        "INSERT INTO customers (full_name, email, phone, date_of_birth, gender, address, works, emergency_contact_name, emergency_contact_phone, membership_type, joined_date, is_active, created_by, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 1, ?12, ?13, ?13)",
    )
    .bind(data.full_name.trim())
    .bind(&data.email)
    .bind(data.phone.trim())
    .bind(&data.date_of_birth)
    .bind(&data.gender)
    .bind(&data.address)
    .bind(&data.works)
    .bind(&data.emergency_contact_name)
    .bind(&data.emergency_contact_phone)
    .bind(data.membership_type.unwrap_or_default())
    .bind(shared::util::today())
    .bind(created_by)
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create customer".into()))
}

/// Returns `None` when no live customer has this id
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: &CustomerUpdate,
) -> RepoResult<Option<Customer>> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customers SET full_name = COALESCE(?1, full_name), phone = COALESCE(?2, phone), email = COALESCE(?3, email), date_of_birth = COALESCE(?4, date_of_birth), gender = COALESCE(?5, gender), address = COALESCE(?6, address), works = COALESCE(?7, works), emergency_contact_name = COALESCE(?8, emergency_contact_name), emergency_contact_phone = COALESCE(?9, emergency_contact_phone), membership_type = COALESCE(?10, membership_type), is_active = COALESCE(?11, is_active), updated_at = ?12 WHERE customer_id = ?13 AND is_deleted = 0",
    )
    .bind(&data.full_name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&data.date_of_birth)
    .bind(&data.gender)
    .bind(&data.address)
    .bind(&data.works)
    .bind(&data.emergency_contact_name)
    .bind(&data.emergency_contact_phone)
    .bind(data.membership_type)
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

/// Soft delete; orders and invoices keep pointing at the row
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customers SET is_deleted = 1, is_active = 0, updated_at = ? WHERE customer_id = ? AND is_deleted = 0",
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
    use shared::models::MembershipType;

    fn walk_in(name: &str) -> CustomerCreate {
        CustomerCreate {
            full_name: name.into(),
            phone: "555-0100".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let (pool, _dir) = test_pool().await;
        let customer = create(&pool, &walk_in("Ana"), None).await.unwrap();
        assert_eq!(customer.membership_type, MembershipType::Basic);
        assert_eq!(customer.joined_date, shared::util::today());
        assert!(customer.plan_name.is_none());
        assert!(customer.is_active);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let (pool, _dir) = test_pool().await;
        let customer = create(&pool, &walk_in("Ana"), None).await.unwrap();

        let update_data = CustomerUpdate {
            membership_type: Some(MembershipType::Vip),
            ..Default::default()
        };
        let updated = update(&pool, customer.customer_id, &update_data)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.membership_type, MembershipType::Vip);
        assert_eq!(updated.full_name, "Ana");
        assert_eq!(updated.phone, "555-0100");
    }

    #[tokio::test]
    async fn test_soft_delete_hides_row_but_keeps_it() {
        let (pool, _dir) = test_pool().await;
        let keep = create(&pool, &walk_in("Keep"), None).await.unwrap();
        let gone = create(&pool, &walk_in("Gone"), None).await.unwrap();

        assert!(delete(&pool, gone.customer_id).await.unwrap());

        let listed: Vec<i64> = find_all(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.customer_id)
            .collect();
        assert_eq!(listed, vec![keep.customer_id]);
        assert!(find_by_id(&pool, gone.customer_id).await.unwrap().is_none());

        let (is_deleted, is_active): (i64, i64) =
            sqlx::query_as("SELECT is_deleted, is_active FROM customers WHERE customer_id = ?")
                .bind(gone.customer_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!((is_deleted, is_active), (1, 0));

        // Updating a deleted row is a no-op
        let result = update(&pool, gone.customer_id, &CustomerUpdate::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
