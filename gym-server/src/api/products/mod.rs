//! Product API 模块
//!
//! 商品、分类、库存调整、低库存预警

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};

use crate::auth::{permissions, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/categories", get(handler::list_categories))
        .route("/alerts/low-stock", get(handler::low_stock));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/stock", patch(handler::adjust_stock))
        .route("/categories", post(handler::create_category))
        .layer(middleware::from_fn(require_permission(
            permissions::PRODUCTS_MANAGE,
        )));

    read_routes.merge(manage_routes)
}
