// ==========================================
// 订单报表核心 - 引擎层
// ==========================================
// 职责: 报表计算与规范文本输出
// 红线: Engine 不拼 SQL
// ==========================================

pub mod report_engine;
pub mod report_serializer;

// 重导出核心引擎
pub use report_engine::ReportEngine;
pub use report_serializer::ReportSerializer;
