use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::core::ServerError;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 |
/// | DATABASE_PATH | WORK_DIR/gym.db | SQLite 数据库文件 |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志 |
/// | LOG_DIR | (无) | 日志文件目录 |
/// | DB_MAX_CONNECTIONS | 5 | 连接池大小 |
/// | BOOTSTRAP_ADMIN_EMAIL / BOOTSTRAP_ADMIN_PASSWORD | (无) | 空库时创建的管理员 |
/// | JWT_SECRET 等 | 见 [`JwtConfig::from_env`] | JWT 配置 |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 JWT_SECRET=... cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// SQLite 数据库路径
    pub database_path: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// 连接池最大连接数
    pub db_max_connections: u32,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 首次启动时创建的管理员
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// 引导管理员账号
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的项使用默认值；JWT 密钥不合法时返回错误
    pub fn from_env() -> Result<Self, ServerError> {
        let jwt = JwtConfig::from_env().map_err(|e| ServerError::Config(e.to_string()))?;
        Ok(Self::with_jwt(jwt))
    }

    fn with_jwt(jwt: JwtConfig) -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("gym.db")
                .to_string_lossy()
                .into_owned()
        });

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_EMAIL"),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin { email, password })
            }
            _ => None,
        };

        Self {
            work_dir,
            database_path,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok(),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            jwt,
            bootstrap_admin,
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(
        database_path: impl Into<String>,
        http_port: u16,
        jwt_secret: impl Into<String>,
    ) -> Self {
        let mut config = Self::with_jwt(JwtConfig::new(jwt_secret));
        config.database_path = database_path.into();
        config.http_port = http_port;
        config.bootstrap_admin = None;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_overrides() {
        let config = Config::with_overrides("/tmp/gym-test.db", 5999, "x".repeat(40));
        assert_eq!(config.database_path, "/tmp/gym-test.db");
        assert_eq!(config.http_port, 5999);
        assert_eq!(config.jwt.secret.len(), 40);
        assert!(config.bootstrap_admin.is_none());
    }
}
