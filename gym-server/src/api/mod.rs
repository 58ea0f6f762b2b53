//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录、注册、用户管理
//! - [`customers`] - 会员 (客户)、会籍、签到
//! - [`membership_plans`] - 会籍套餐
//! - [`products`] - 商品、分类、库存
//! - [`orders`] - 订单
//! - [`billing`] - 发票
//! - [`gym_activities`] - 课程、教练、排课、报名
//! - [`reports`] - 报表

pub mod auth;
pub mod billing;
pub mod customers;
pub mod gym_activities;
pub mod health;
pub mod membership_plans;
pub mod orders;
pub mod products;
pub mod reports;

use std::any::Any;

use axum::{
    Router,
    http::{Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;
use crate::middleware::logging_middleware;

// 供 handler 使用的通用类型
pub use crate::utils::{ApiJson, ApiResponse, AppError, AppResult};

/// 创建接口只返回 `{id}` 时的响应体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub id: i64,
}

/// 构建 Axum 路由 (不含状态)
pub fn build_router() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(customers::router())
        .merge(membership_plans::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(billing::router())
        .merge(gym_activities::router())
        .merge(reports::router())
        .fallback(not_found)
}

/// 带状态和完整中间件栈的路由
pub fn build_app(state: ServerState) -> Router {
    let app = build_router()
        // JWT 认证中间件 - require_auth 内部跳过公共路由和未匹配路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);
    with_middleware(app)
}

/// 外层中间件栈
///
/// 外层先执行: 生成请求 ID → trace → 请求日志 → 回写请求 ID → CORS → 压缩 → panic 捕获
pub fn with_middleware(app: Router) -> Router {
    app.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(logging_middleware))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(CorsLayer::permissive())
            .layer(CompressionLayer::new())
            .layer(CatchPanicLayer::custom(handle_panic)),
    )
}

/// handler panic → 500 信封，panic 内容只写日志
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::internal(format!("Handler panicked: {detail}")).into_response()
}

async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        ApiResponse::<()>::failure(format!("Route {} {} not found", method, uri.path())),
    )
}
