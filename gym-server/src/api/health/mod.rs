//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/health | GET | 健康检查 (含数据库探测) | 无 |
//!
//! ```json
//! {
//!   "status": "ok",
//!   "version": "0.1.0",
//!   "database": "ok",
//!   "endpoints": ["/api/auth", "/api/customers", "..."]
//! }
//! ```

use axum::{Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::ApiResponse;

/// 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

/// 本进程提供的接口分组
const ENDPOINTS: &[&str] = &[
    "/api/auth",
    "/api/customers",
    "/api/membership-plans",
    "/api/products",
    "/api/orders",
    "/api/billing",
    "/api/gym-activities",
    "/api/reports",
];

#[derive(Serialize)]
pub struct HealthResponse {
    /// ok | degraded
    status: &'static str,
    version: &'static str,
    /// ok | error
    database: &'static str,
    endpoints: &'static [&'static str],
}

/// GET /api/health
async fn health(State(state): State<ServerState>) -> ApiResponse<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(state.pool()).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "Health check: database unreachable");
            "error"
        }
    };

    ApiResponse::success(HealthResponse {
        status: if database == "ok" { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        endpoints: ENDPOINTS,
    })
}
