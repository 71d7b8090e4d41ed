// ==========================================
// 订单报表核心 - 领域层
// ==========================================
// 职责: 订单记录模型、报表对象、导入结果
// 红线: 领域层不依赖仓储/导入实现
// ==========================================

pub mod ingest;
pub mod order;
pub mod report;
pub mod types;

// 重导出核心类型
pub use ingest::{BatchSummary, FileOutcome, FileStatus, IngestResult, RejectedLine, REJECT_REASON};
pub use order::{Order, ValidationError, ValidationResult};
pub use report::{Report, ReportData, ReportParams, ScalarValue};
pub use types::{OrderField, ReportKind, SourceFormat};
