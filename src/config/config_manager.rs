// ==========================================
// 订单报表核心 - 配置管理器
// ==========================================
// 职责: 配置加载、环境变量覆写、保存
// 存储: JSON 文件（不存在时使用默认值）
// ==========================================

use crate::db::{DEFAULT_BUSY_TIMEOUT_MS, IN_MEMORY_DB_PATH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

// ==========================================
// 配置键（环境变量）
// ==========================================
pub mod config_keys {
    /// 数据库路径覆写
    pub const DB_PATH: &str = "ORDER_REPORTS_DB_PATH";
    /// 导出目录覆写
    pub const EXPORT_DIR: &str = "ORDER_REPORTS_EXPORT_DIR";
}

// ==========================================
// ConfigError - 配置错误
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {0}")]
    ReadError(String),

    #[error("配置文件格式错误: {0}")]
    ParseError(String),

    #[error("配置文件写入失败: {0}")]
    WriteError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// AppConfig - 应用配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite 路径，":memory:" 为一次性内存库
    pub db_path: String,
    /// 报表导出目录
    pub export_dir: Option<PathBuf>,
    pub busy_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: IN_MEMORY_DB_PATH.to_string(),
            export_dir: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl AppConfig {
    /// 实际使用的导出目录
    ///
    /// 顺序: 显式配置 → 用户文档目录 → 当前目录
    pub fn resolved_export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(dirs::document_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config: AppConfig,
}

impl ConfigManager {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// 加载配置文件并应用环境变量覆写
    ///
    /// # 参数
    /// - path: JSON 配置文件路径
    ///
    /// # 返回
    /// - Ok(ConfigManager): 文件不存在时为默认配置
    /// - Err(ConfigError): 文件不可读或格式错误
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
            serde_json::from_str::<AppConfig>(&raw)
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?
        } else {
            debug!(path = %path.display(), "配置文件不存在，使用默认配置");
            AppConfig::default()
        };

        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        info!(db_path = %config.db_path, "配置加载完成");
        Ok(Self { config })
    }

    /// 保存为格式化 JSON
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let json = serde_json::to_string_pretty(&self.config)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        std::fs::write(path, json)
            .map_err(|e| ConfigError::WriteError(format!("{}: {}", path.display(), e)))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn into_config(self) -> AppConfig {
        self.config
    }
}

/// 环境变量覆写（非空值生效）
fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(db_path) = lookup(config_keys::DB_PATH).filter(|v| !v.trim().is_empty()) {
        config.db_path = db_path;
    }
    if let Some(dir) = lookup(config_keys::EXPORT_DIR).filter(|v| !v.trim().is_empty()) {
        config.export_dir = Some(PathBuf::from(dir));
    }
}
