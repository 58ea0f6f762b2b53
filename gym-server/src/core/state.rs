use std::path::Path;
use std::sync::Arc;

use shared::models::{Role, UserCreate};
use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::db::repository::user;

/// 服务器状态 - 持有所有共享资源
///
/// 使用 Arc / 连接池句柄实现浅拷贝，每个请求克隆一次。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 手动构造 (测试中直接注入连接池)
    pub fn new(config: Config, pool: SqlitePool, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            pool,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 确保数据库目录存在
    /// 2. 打开连接池并执行迁移
    /// 3. 创建 JWT 服务
    /// 4. 空库时创建引导管理员
    pub async fn initialize(config: &Config) -> Result<Self> {
        if let Some(parent) = Path::new(&config.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let db = DbService::with_max_connections(&config.database_path, config.db_max_connections)
            .await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let state = Self::new(config.clone(), db.pool, jwt_service);
        state.ensure_bootstrap_admin().await?;

        Ok(state)
    }

    /// 获取连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// users 表为空且配置了 BOOTSTRAP_ADMIN_* 时创建管理员
    pub async fn ensure_bootstrap_admin(&self) -> Result<()> {
        let Some(admin) = &self.config.bootstrap_admin else {
            return Ok(());
        };

        let count = user::count(&self.pool)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;
        if count > 0 {
            return Ok(());
        }

        let password_hash = crate::auth::hash_password(&admin.password)
            .map_err(|e| ServerError::Config(format!("Failed to hash admin password: {e}")))?;
        let data = UserCreate {
            full_name: "Administrator".to_string(),
            email: admin.email.trim().to_lowercase(),
            password: String::new(),
            phone: None,
            role_id: Some(Role::Admin.id()),
        };
        let created = user::create(&self.pool, &data, &password_hash, None)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        tracing::info!(user_id = created.user_id, email = %created.email, "Bootstrap administrator created");
        Ok(())
    }
}
