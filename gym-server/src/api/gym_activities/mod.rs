//! Gym Activity API 模块
//!
//! 课程模板 → 排课 → 报名
//!
//! | 路径 | 写权限 |
//! |------|--------|
//! | /, /{id}, /trainers, /schedules/* | activities:manage |
//! | /schedules/{id}/enroll, /enrollments/* | enrollments:manage |

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post, put},
};

use crate::auth::{permissions, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/gym-activities", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/trainers", get(handler::list_trainers))
        .route("/schedules", get(handler::list_schedules))
        .route("/schedules/{id}", get(handler::get_schedule))
        .route("/schedules/{id}/enrollments", get(handler::list_enrollments));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/trainers", post(handler::create_trainer))
        .route("/schedules", post(handler::create_schedule))
        .route(
            "/schedules/{id}",
            put(handler::update_schedule).delete(handler::delete_schedule),
        )
        .layer(middleware::from_fn(require_permission(
            permissions::ACTIVITIES_MANAGE,
        )));

    let enrollment_routes = Router::new()
        .route("/schedules/{id}/enroll", post(handler::enroll))
        .route("/enrollments/{id}", delete(handler::cancel_enrollment))
        .route("/enrollments/{id}/attendance", patch(handler::mark_attendance))
        .layer(middleware::from_fn(require_permission(
            permissions::ENROLLMENTS_MANAGE,
        )));

    read_routes.merge(manage_routes).merge(enrollment_routes)
}
