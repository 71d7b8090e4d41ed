// ==========================================
// 订单报表核心 - API 层
// ==========================================
// 职责: 面向调用方（界面/导出）的业务接口
// ==========================================

pub mod error;
pub mod import_api;
pub mod report_api;

// 重导出
pub use error::{ApiError, ApiResult};
pub use import_api::ImportApi;
pub use report_api::{ReportApi, ReportHistory};
