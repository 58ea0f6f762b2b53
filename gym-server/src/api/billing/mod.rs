//! Billing (Invoice) API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};

use crate::auth::{permissions, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/billing", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/customer/{customer_id}", get(handler::list_by_customer));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/status", patch(handler::update_status))
        .layer(middleware::from_fn(require_permission(
            permissions::BILLING_MANAGE,
        )));

    let report_routes = Router::new()
        .route("/reports/summary", get(handler::summary))
        .layer(middleware::from_fn(require_permission(
            permissions::REPORTS_VIEW,
        )));

    read_routes.merge(manage_routes).merge(report_routes)
}
