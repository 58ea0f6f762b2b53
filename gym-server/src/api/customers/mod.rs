//! Customer API 模块
//!
//! 客户资料、会籍分配、签到签出

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{permissions, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/customers", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：登录即可
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/memberships", get(handler::list_memberships))
        .route("/{id}/attendance", get(handler::list_attendance));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_permission(
            permissions::CUSTOMERS_MANAGE,
        )));

    let membership_routes = Router::new()
        .route("/{id}/memberships", post(handler::assign_membership))
        .layer(middleware::from_fn(require_permission(
            permissions::MEMBERSHIPS_MANAGE,
        )));

    let attendance_routes = Router::new()
        .route("/{id}/checkin", post(handler::check_in))
        .route("/checkout/{attendance_id}", put(handler::check_out))
        .layer(middleware::from_fn(require_permission(
            permissions::ATTENDANCE_MANAGE,
        )));

    read_routes
        .merge(manage_routes)
        .merge(membership_routes)
        .merge(attendance_routes)
}
