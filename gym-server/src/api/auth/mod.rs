//! Authentication and user management routes
//!
//! - `/api/auth/login`: public
//! - `/api/auth/profile`: any authenticated user
//! - `/api/auth/register`, `/api/auth/users/*`: `users:manage`

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{permissions, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    let open_routes = Router::new()
        .route("/login", post(handler::login))
        .route("/profile", get(handler::profile));

    // user management: admin only
    let manage_routes = Router::new()
        .route("/register", post(handler::register))
        .route("/users", get(handler::list_users))
        .route(
            "/users/{id}",
            put(handler::update_user).delete(handler::delete_user),
        )
        .layer(middleware::from_fn(require_permission(
            permissions::USERS_MANAGE,
        )));

    open_routes.merge(manage_routes)
}
