//! Membership Plan and Customer Membership Repository

use chrono::{Days, NaiveDate};

use super::{RepoError, RepoResult};
use shared::ErrorCode;
use shared::models::{Membership, MembershipAssign, MembershipPlan, MembershipPlanCreate};
use sqlx::SqlitePool;

const MEMBERSHIP_SELECT: &str = "SELECT m.membership_id, m.customer_id, m.plan_id, p.plan_name, p.price, m.start_date, m.end_date, m.status, m.assigned_by, u.full_name AS assigned_by_name, m.notes, m.created_at FROM customer_memberships m JOIN membership_plans p ON m.plan_id = p.plan_id LEFT JOIN users u ON m.assigned_by = u.user_id";

// ── Plans ───────────────────────────────────────────────────────────

pub async fn find_all_plans(pool: &SqlitePool) -> RepoResult<Vec<MembershipPlan>> {
    let rows = sqlx::query_as::<_, MembershipPlan>(
        "SELECT plan_id, plan_name, description, duration_days, price, is_active, created_at FROM membership_plans WHERE is_deleted = 0 AND is_active = 1 ORDER BY price, plan_id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_plan(pool: &SqlitePool, plan_id: i64) -> RepoResult<Option<MembershipPlan>> {
    let row = sqlx::query_as::<_, MembershipPlan>(
        "SELECT plan_id, plan_name, description, duration_days, price, is_active, created_at FROM membership_plans WHERE plan_id = ? AND is_deleted = 0",
    )
    .bind(plan_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create_plan(pool: &SqlitePool, data: &MembershipPlanCreate) -> RepoResult<MembershipPlan> {
    let id = sqlx::query(
        "INSERT INTO membership_plans (plan_name, description, duration_days, price, is_active, created_at) VALUES (?1, ?2, ?3, ?4, 1, ?5)",
    )
    .bind(data.plan_name.trim())
    .bind(&data.description)
    .bind(data.duration_days)
    .bind(data.price)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_plan(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create membership plan".into()))
}

// ── Customer memberships ────────────────────────────────────────────

pub async fn find_by_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<Vec<Membership>> {
    let sql = format!(
        "{MEMBERSHIP_SELECT} WHERE m.customer_id = ? AND m.is_deleted = 0 ORDER BY m.start_date DESC, m.membership_id DESC"
    );
    let rows = sqlx::query_as::<_, Membership>(&sql)
        .bind(customer_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Membership>> {
    let sql = format!("{MEMBERSHIP_SELECT} WHERE m.membership_id = ? AND m.is_deleted = 0");
    let row = sqlx::query_as::<_, Membership>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// `start + duration_days`
pub fn end_date(start: NaiveDate, duration_days: i64) -> RepoResult<NaiveDate> {
    u64::try_from(duration_days)
        .ok()
        .and_then(|days| start.checked_add_days(Days::new(days)))
        .ok_or_else(|| RepoError::Validation(format!("Invalid plan duration: {duration_days} days")))
}

/// Assign a plan to a customer
///
/// Any active membership of the customer is expired in the same transaction,
/// so a customer has at most one active membership.
pub async fn assign(
    pool: &SqlitePool,
    customer_id: i64,
    start: NaiveDate,
    data: &MembershipAssign,
    assigned_by: Option<i64>,
) -> RepoResult<Membership> {
    let mut tx = pool.begin().await?;

    let customer: Option<i64> = sqlx::query_scalar(
        "SELECT customer_id FROM customers WHERE customer_id = ? AND is_deleted = 0",
    )
    .bind(customer_id)
    .fetch_optional(&mut *tx)
    .await?;
    if customer.is_none() {
        return Err(RepoError::business(ErrorCode::CustomerNotFound));
    }

    let duration: Option<i64> = sqlx::query_scalar(
        "SELECT duration_days FROM membership_plans WHERE plan_id = ? AND is_deleted = 0 AND is_active = 1",
    )
    .bind(data.plan_id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some(duration) = duration else {
        return Err(RepoError::business(ErrorCode::MembershipPlanNotFound));
    };
    let end = end_date(start, duration)?;

    sqlx::query(
        "UPDATE customer_memberships SET status = 'expired' WHERE customer_id = ? AND status = 'active' AND is_deleted = 0",
    )
    .bind(customer_id)
    .execute(&mut *tx)
    .await?;

    let id = sqlx::query(
        "INSERT INTO customer_memberships (customer_id, plan_id, start_date, end_date, status, assigned_by, notes, created_at) VALUES (?1, ?2, ?3, ?4, 'active', ?5, ?6, ?7)",
    )
    .bind(customer_id)
    .bind(data.plan_id)
    .bind(start.format("%Y-%m-%d").to_string())
    .bind(end.format("%Y-%m-%d").to_string())
    .bind(assigned_by)
    .bind(&data.notes)
    .bind(shared::util::now_millis())
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to assign membership".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::customer;
    use crate::db::test_support::test_pool;
    use shared::models::CustomerCreate;

    async fn setup(pool: &SqlitePool) -> (i64, MembershipPlan) {
        let c = customer::create(
            pool,
            &CustomerCreate {
                full_name: "Ben".into(),
                phone: "555-0101".into(),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
        let plan = create_plan(
            pool,
            &MembershipPlanCreate {
                plan_name: "Monthly".into(),
                description: None,
                duration_days: 30,
                price: 49.0,
            },
        )
        .await
        .unwrap();
        (c.customer_id, plan)
    }

    fn assign_req(plan_id: i64, start: &str) -> MembershipAssign {
        MembershipAssign {
            plan_id,
            start_date: start.into(),
            notes: None,
        }
    }

    #[test]
    fn test_end_date_arithmetic() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(end_date(start, 30).unwrap(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(end_date(start, -1).is_err());
    }

    #[tokio::test]
    async fn test_assign_expires_previous_membership() {
        let (pool, _dir) = test_pool().await;
        let (customer_id, plan) = setup(&pool).await;

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let first = assign(&pool, customer_id, start, &assign_req(plan.plan_id, "2024-01-01"), None)
            .await
            .unwrap();
        assert_eq!(first.end_date, "2024-01-31");
        assert_eq!(first.status, "active");

        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assign(&pool, customer_id, start, &assign_req(plan.plan_id, "2024-02-01"), None)
            .await
            .unwrap();

        let all = find_by_customer(&pool, customer_id).await.unwrap();
        assert_eq!(all.len(), 2);
        let active: Vec<_> = all.iter().filter(|m| m.status == "active").collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].start_date, "2024-02-01");
    }

    #[tokio::test]
    async fn test_assign_unknown_plan() {
        let (pool, _dir) = test_pool().await;
        let (customer_id, _) = setup(&pool).await;
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = assign(&pool, customer_id, start, &assign_req(999, "2024-01-01"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::MembershipPlanNotFound, _)));
    }
}
