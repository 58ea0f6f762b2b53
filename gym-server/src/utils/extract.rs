//! JSON 请求体提取器
//!
//! 与 `axum::Json` 相同，但解析失败时返回统一的 `ApiResponse` 错误体
//! (ErrorCode::InvalidFormat, 400)，而不是 axum 的纯文本。

use axum::extract::FromRequest;

use crate::utils::AppError;

#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
