use shared::error::{AppError, ErrorCategory, ErrorCode};
use thiserror::Error;

/// 启动和运行阶段的错误 (请求处理使用 `AppError`)
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("认证错误: {0}")]
    Auth(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    App(AppError),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

/// 按错误分类映射
impl From<AppError> for ServerError {
    fn from(err: AppError) -> Self {
        match (err.code, err.code.category()) {
            (ErrorCode::DatabaseError, _) => ServerError::Database(err.message),
            (ErrorCode::ConfigError, _) => ServerError::Config(err.message),
            (_, ErrorCategory::Auth) => ServerError::Auth(err.message),
            _ => ServerError::App(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_mapped_by_category() {
        let err: ServerError = AppError::database("disk I/O error").into();
        assert!(matches!(err, ServerError::Database(m) if m == "disk I/O error"));

        let err: ServerError = AppError::new(ErrorCode::ConfigError).into();
        assert!(matches!(err, ServerError::Config(_)));

        let err: ServerError = AppError::invalid_token("bad signature").into();
        assert!(matches!(err, ServerError::Auth(_)));

        let err: ServerError = AppError::validation("phone is required").into();
        assert!(matches!(err, ServerError::App(e) if e.code == ErrorCode::ValidationFailed));
    }
}
