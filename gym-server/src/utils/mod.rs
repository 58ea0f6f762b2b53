//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] / [`ApiResponse`] - 统一错误与响应 (from shared::error)
//! - [`logger`] - 日志初始化
//! - [`validation`] - 输入校验
//! - [`money`] - 金额计算 (rust_decimal)
//! - [`ApiJson`] - JSON 请求体提取器

pub mod extract;
pub mod logger;
pub mod money;
pub mod validation;

pub use extract::ApiJson;
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
