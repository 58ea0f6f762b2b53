//! Schedule and Enrollment Repository
//!
//! `enrolled_count` is kept equal to the number of live enrollments:
//! enroll increments and cancel decrements inside the same transaction
//! as the enrollment row change.

use super::gym_activity::ensure_trainer;
use super::{RepoError, RepoResult};
use shared::ErrorCode;
use shared::models::{
    AttendanceMark, Enrollment, Schedule, ScheduleCreate, ScheduleStatus, ScheduleUpdate,
};
use sqlx::{SqliteConnection, SqlitePool};

const SCHEDULE_SELECT: &str = "SELECT s.schedule_id, s.activity_id, a.activity_name, s.trainer_id, t.full_name AS trainer_name, s.schedule_date, s.start_time, s.end_time, s.max_capacity, s.enrolled_count, s.room, s.status, s.notes, s.created_at, s.updated_at FROM schedules s JOIN gym_activities a ON s.activity_id = a.activity_id LEFT JOIN trainers t ON s.trainer_id = t.trainer_id";

const ENROLLMENT_SELECT: &str = "SELECT e.enrollment_id, e.schedule_id, e.customer_id, c.full_name, c.phone, e.attendance, e.enrolled_at FROM schedule_enrollments e JOIN customers c ON e.customer_id = c.customer_id";

// ── Schedules ───────────────────────────────────────────────────────

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Schedule>> {
    let sql = format!(
        "{SCHEDULE_SELECT} WHERE s.is_deleted = 0 ORDER BY s.schedule_date, s.start_time, s.schedule_id"
    );
    let rows = sqlx::query_as::<_, Schedule>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Schedule>> {
    let sql = format!("{SCHEDULE_SELECT} WHERE s.schedule_id = ? AND s.is_deleted = 0");
    let row = sqlx::query_as::<_, Schedule>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Trainer and capacity default to the activity's
pub async fn create(
    pool: &SqlitePool,
    data: &ScheduleCreate,
    created_by: Option<i64>,
) -> RepoResult<Schedule> {
    ensure_trainer(pool, data.trainer_id).await?;

    let activity: Option<(Option<i64>, i64)> = sqlx::query_as(
        "SELECT trainer_id, max_capacity FROM gym_activities WHERE activity_id = ? AND is_deleted = 0",
    )
    .bind(data.activity_id)
    .fetch_optional(pool)
    .await?;
    let Some((activity_trainer, activity_capacity)) = activity else {
        return Err(RepoError::business(ErrorCode::ActivityNotFound));
    };

    let now = shared::util::now_millis();
    let id = sqlx::query(
        "INSERT INTO schedules (activity_id, trainer_id, schedule_date, start_time, end_time, max_capacity, enrolled_count, room, status, notes, created_by, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, 'scheduled', ?8, ?9, ?10, ?10)",
    )
    .bind(data.activity_id)
    .bind(data.trainer_id.or(activity_trainer))
    .bind(&data.schedule_date)
    .bind(&data.start_time)
    .bind(&data.end_time)
    .bind(data.max_capacity.unwrap_or(activity_capacity))
    .bind(&data.room)
    .bind(&data.notes)
    .bind(created_by)
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create schedule".into()))
}

/// Capacity can not drop below the current enrolment
pub async fn update(pool: &SqlitePool, id: i64, data: &ScheduleUpdate) -> RepoResult<Option<Schedule>> {
    ensure_trainer(pool, data.trainer_id).await?;

    let rows = sqlx::query(
        "UPDATE schedules SET trainer_id = COALESCE(?1, trainer_id), schedule_date = COALESCE(?2, schedule_date), start_time = COALESCE(?3, start_time), end_time = COALESCE(?4, end_time), max_capacity = COALESCE(?5, max_capacity), room = COALESCE(?6, room), status = COALESCE(?7, status), notes = COALESCE(?8, notes), updated_at = ?9 WHERE schedule_id = ?10 AND is_deleted = 0 AND COALESCE(?5, max_capacity) >= enrolled_count",
    )
    .bind(data.trainer_id)
    .bind(&data.schedule_date)
    .bind(&data.start_time)
    .bind(&data.end_time)
    .bind(data.max_capacity)
    .bind(&data.room)
    .bind(data.status)
    .bind(&data.notes)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    let current = find_by_id(pool, id).await?;
    match current {
        Some(schedule) if rows.rows_affected() == 0 => Err(RepoError::Validation(format!(
            "max_capacity can not be lower than the {} enrolled customers",
            schedule.enrolled_count
        ))),
        other => Ok(other),
    }
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE schedules SET is_deleted = 1, updated_at = ? WHERE schedule_id = ? AND is_deleted = 0",
    )
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

// ── Enrollments ─────────────────────────────────────────────────────

pub async fn find_enrollments(pool: &SqlitePool, schedule_id: i64) -> RepoResult<Vec<Enrollment>> {
    let sql = format!(
        "{ENROLLMENT_SELECT} WHERE e.schedule_id = ? AND e.is_deleted = 0 ORDER BY e.enrolled_at, e.enrollment_id"
    );
    let rows = sqlx::query_as::<_, Enrollment>(&sql)
        .bind(schedule_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_enrollment(pool: &SqlitePool, id: i64) -> RepoResult<Option<Enrollment>> {
    let sql = format!("{ENROLLMENT_SELECT} WHERE e.enrollment_id = ? AND e.is_deleted = 0");
    let row = sqlx::query_as::<_, Enrollment>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Why a seat could not be taken on this schedule
async fn seat_refusal(conn: &mut SqliteConnection, schedule_id: i64) -> RepoResult<RepoError> {
    let row: Option<ScheduleStatus> =
        sqlx::query_scalar("SELECT status FROM schedules WHERE schedule_id = ? AND is_deleted = 0")
            .bind(schedule_id)
            .fetch_optional(conn)
            .await?;
    Ok(match row {
        None => RepoError::business(ErrorCode::ScheduleNotFound),
        Some(ScheduleStatus::Cancelled) => RepoError::business(ErrorCode::ScheduleCancelled),
        Some(_) => RepoError::business(ErrorCode::ScheduleFull),
    })
}

/// Enroll a customer
///
/// The seat is taken first with a guarded increment, so the write lock is held
/// before anything is read and two racing enrollments can not overfill the schedule.
pub async fn enroll(
    pool: &SqlitePool,
    schedule_id: i64,
    customer_id: i64,
    created_by: Option<i64>,
) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let taken = sqlx::query(
        "UPDATE schedules SET enrolled_count = enrolled_count + 1, updated_at = ?1 WHERE schedule_id = ?2 AND is_deleted = 0 AND status != 'cancelled' AND enrolled_count < max_capacity",
    )
    .bind(now)
    .bind(schedule_id)
    .execute(&mut *tx)
    .await?;
    if taken.rows_affected() == 0 {
        return Err(seat_refusal(&mut *tx, schedule_id).await?);
    }

    let customer: Option<i64> = sqlx::query_scalar(
        "SELECT customer_id FROM customers WHERE customer_id = ? AND is_deleted = 0",
    )
    .bind(customer_id)
    .fetch_optional(&mut *tx)
    .await?;
    if customer.is_none() {
        return Err(RepoError::business(ErrorCode::CustomerNotFound));
    }

    let id = sqlx::query(
        "INSERT INTO schedule_enrollments (schedule_id, customer_id, attendance, created_by, enrolled_at, updated_at) VALUES (?1, ?2, 'pending', ?3, ?4, ?4)",
    )
    .bind(schedule_id)
    .bind(customer_id)
    .bind(created_by)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::business(ErrorCode::AlreadyEnrolled),
        other => other,
    })?
    .last_insert_rowid();

    tx.commit().await?;
    Ok(id)
}

/// Cancel an enrollment and free its seat
pub async fn cancel_enrollment(pool: &SqlitePool, enrollment_id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let schedule_id: Option<i64> = sqlx::query_scalar(
        "UPDATE schedule_enrollments SET is_deleted = 1, updated_at = ?1 WHERE enrollment_id = ?2 AND is_deleted = 0 RETURNING schedule_id",
    )
    .bind(now)
    .bind(enrollment_id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some(schedule_id) = schedule_id else {
        return Ok(false);
    };

    sqlx::query(
        "UPDATE schedules SET enrolled_count = enrolled_count - 1, updated_at = ?1 WHERE schedule_id = ?2 AND enrolled_count > 0",
    )
    .bind(now)
    .bind(schedule_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(true)
}

pub async fn set_attendance(
    pool: &SqlitePool,
    enrollment_id: i64,
    attendance: AttendanceMark,
) -> RepoResult<Option<Enrollment>> {
    let rows = sqlx::query(
        "UPDATE schedule_enrollments SET attendance = ?1, updated_at = ?2 WHERE enrollment_id = ?3 AND is_deleted = 0",
    )
    .bind(attendance)
    .bind(shared::util::now_millis())
    .bind(enrollment_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Ok(None);
    }
    find_enrollment(pool, enrollment_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{customer, gym_activity};
    use crate::db::test_support::test_pool;
    use shared::models::{CustomerCreate, GymActivityCreate};

    async fn new_customer(pool: &SqlitePool, name: &str) -> i64 {
        customer::create(
            pool,
            &CustomerCreate {
                full_name: name.into(),
                phone: "555-0199".into(),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap()
        .customer_id
    }

    async fn schedule(pool: &SqlitePool, capacity: i64) -> Schedule {
        let activity = gym_activity::create(
            pool,
            &GymActivityCreate {
                activity_name: "HIIT".into(),
                max_capacity: Some(capacity),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
        create(
            pool,
            &ScheduleCreate {
                activity_id: activity.activity_id,
                schedule_date: "2024-05-01".into(),
                start_time: "18:00".into(),
                end_time: "19:00".into(),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap()
    }

    async fn enrolled_count(pool: &SqlitePool, schedule_id: i64) -> i64 {
        find_by_id(pool, schedule_id).await.unwrap().unwrap().enrolled_count
    }

    #[tokio::test]
    async fn test_capacity_defaults_to_activity() {
        let (pool, _dir) = test_pool().await;
        let s = schedule(&pool, 12).await;
        assert_eq!(s.max_capacity, 12);
        assert_eq!(s.activity_name, "HIIT");
        assert_eq!(s.status, ScheduleStatus::Scheduled);
    }

    #[tokio::test]
    async fn test_double_enroll_conflicts_and_counts_once() {
        let (pool, _dir) = test_pool().await;
        let s = schedule(&pool, 10).await;
        let c = new_customer(&pool, "Eve").await;

        enroll(&pool, s.schedule_id, c, None).await.unwrap();
        let err = enroll(&pool, s.schedule_id, c, None).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::AlreadyEnrolled, _)));

        assert_eq!(enrolled_count(&pool, s.schedule_id).await, 1);
        assert_eq!(find_enrollments(&pool, s.schedule_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_frees_seat_and_allows_reenroll() {
        let (pool, _dir) = test_pool().await;
        let s = schedule(&pool, 1).await;
        let first = new_customer(&pool, "Finn").await;
        let second = new_customer(&pool, "Gus").await;

        let enrollment = enroll(&pool, s.schedule_id, first, None).await.unwrap();
        let err = enroll(&pool, s.schedule_id, second, None).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::ScheduleFull, _)));

        assert!(cancel_enrollment(&pool, enrollment).await.unwrap());
        assert!(!cancel_enrollment(&pool, enrollment).await.unwrap());
        assert_eq!(enrolled_count(&pool, s.schedule_id).await, 0);

        enroll(&pool, s.schedule_id, first, None).await.unwrap();
        assert_eq!(enrolled_count(&pool, s.schedule_id).await, 1);
    }

    #[tokio::test]
    async fn test_enroll_rejections_leave_count_untouched() {
        let (pool, _dir) = test_pool().await;
        let s = schedule(&pool, 5).await;

        let err = enroll(&pool, s.schedule_id, 4242, None).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::CustomerNotFound, _)));
        assert_eq!(enrolled_count(&pool, s.schedule_id).await, 0);

        let c = new_customer(&pool, "Hal").await;
        let err = enroll(&pool, 999, c, None).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::ScheduleNotFound, _)));

        let cancel = ScheduleUpdate {
            status: Some(ScheduleStatus::Cancelled),
            ..Default::default()
        };
        update(&pool, s.schedule_id, &cancel).await.unwrap().unwrap();
        let err = enroll(&pool, s.schedule_id, c, None).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::ScheduleCancelled, _)));
    }

    #[tokio::test]
    async fn test_capacity_can_not_drop_below_enrolled() {
        let (pool, _dir) = test_pool().await;
        let s = schedule(&pool, 5).await;
        for name in ["Ivy", "Jon"] {
            let c = new_customer(&pool, name).await;
            enroll(&pool, s.schedule_id, c, None).await.unwrap();
        }

        let shrink = ScheduleUpdate {
            max_capacity: Some(1),
            ..Default::default()
        };
        let err = update(&pool, s.schedule_id, &shrink).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_mark_attendance() {
        let (pool, _dir) = test_pool().await;
        let s = schedule(&pool, 5).await;
        let c = new_customer(&pool, "Kim").await;
        let id = enroll(&pool, s.schedule_id, c, None).await.unwrap();

        let marked = set_attendance(&pool, id, AttendanceMark::Present)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(marked.attendance, AttendanceMark::Present);
        assert!(set_attendance(&pool, 777, AttendanceMark::Absent).await.unwrap().is_none());
    }
}
