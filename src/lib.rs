// ==========================================
// 订单报表核心 - 核心库
// ==========================================
// 技术栈: Rust + SQLite（内嵌查询执行器）
// 系统定位: 订单文件导入、校验与报表生成
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 订单模型与报表类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 报表计算与输出
pub mod engine;

// 导入层 - CSV / XML
pub mod importer;

// 配置层 - 应用配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{OrderField, ReportKind, SourceFormat};

// 领域实体
pub use domain::{
    BatchSummary, FileOutcome, FileStatus, IngestResult, Order, RejectedLine, Report, ReportData,
    ReportParams, ScalarValue, ValidationError,
};

// 导入 / 仓储 / 引擎
pub use engine::{ReportEngine, ReportSerializer};
pub use importer::{CsvParser, OrderImporter, RecordParser, XmlParser};
pub use repository::{MemoryOrderRepository, OrderRepository, SqliteOrderRepository};

// API
pub use api::{ApiError, ApiResult, ImportApi, ReportApi};
pub use app::AppState;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Order Reports";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
