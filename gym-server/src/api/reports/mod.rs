//! Reports API 模块 (reports:view)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::{permissions, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/revenue", get(handler::revenue_by_type))
        .route("/monthly", get(handler::monthly_revenue))
        .route("/low-stock", get(handler::low_stock))
        .layer(middleware::from_fn(require_permission(
            permissions::REPORTS_VIEW,
        )))
}
