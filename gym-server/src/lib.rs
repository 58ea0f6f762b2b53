//! Gym Server - 健身房管理系统 REST API
//!
//! # 模块结构
//!
//! ```text
//! gym-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、角色权限表
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # SQLite 连接池、迁移、仓储
//! ├── orders/        # 下单事务 (库存扣减)
//! ├── middleware/    # 请求日志
//! └── utils/         # 日志、校验、金额计算
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod middleware;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// 从 shared 重新导出统一错误类型
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Security logging macro - 写入 security 目标
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 加载 .env 并初始化日志
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let json = std::env::var("LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);
    let log_dir = std::env::var("LOG_DIR").ok();

    utils::logger::init_logger_with_file(&level, json, log_dir.as_deref())
}
