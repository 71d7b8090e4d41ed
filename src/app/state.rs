// ==========================================
// 订单报表核心 - 应用状态
// ==========================================
// 职责: 显式构造仓储、引擎与API实例，生命周期归调用方所有
// ==========================================

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::api::{ApiResult, ImportApi, ReportApi, ReportHistory};
use crate::config::{AppConfig, ConfigManager};
use crate::repository::{OrderRepository, SqliteOrderRepository};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 生效的配置
    pub config: AppConfig,

    /// 订单仓储
    pub order_repo: Arc<dyn OrderRepository>,

    /// 订单导入API
    pub import_api: Arc<ImportApi>,

    /// 报表API
    pub report_api: Arc<ReportApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - config: 应用配置
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开 SQLite 并初始化 schema
    /// 2. 清空已有订单（启动时订单存储总是空的）
    /// 3. 创建共享的会话报表历史
    /// 4. 创建所有API实例
    pub fn new(config: AppConfig) -> ApiResult<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", config.db_path);

        let order_repo: Arc<dyn OrderRepository> = Arc::new(SqliteOrderRepository::new(
            &config.db_path,
            config.busy_timeout_ms,
        )?);
        // 文件库可能残留上次运行的订单
        order_repo.clear()?;
        Ok(Self::with_repository(config, order_repo))
    }

    /// 使用已有仓储创建（例如内存仓储）
    pub fn with_repository(config: AppConfig, order_repo: Arc<dyn OrderRepository>) -> Self {
        let history = Arc::new(ReportHistory::default());

        let import_api = Arc::new(ImportApi::new(order_repo.clone(), history.clone()));
        let report_api = Arc::new(ReportApi::new(
            order_repo.clone(),
            history,
            config.resolved_export_dir(),
        ));

        Self {
            config,
            order_repo,
            import_api,
            report_api,
        }
    }

    /// 从配置文件创建（文件不存在时使用默认配置）
    pub fn from_config_file(path: &Path) -> anyhow::Result<Self> {
        let config = ConfigManager::load(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?
            .into_config();
        Self::new(config).context("初始化应用状态失败")
    }
}
