// ==========================================
// 订单报表核心 - 配置层
// ==========================================
// 职责: 应用配置加载,支持环境变量覆写
// 存储: JSON 文件
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, AppConfig, ConfigError, ConfigManager, ConfigResult};
