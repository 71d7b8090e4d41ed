// ==========================================
// 订单报表核心 - 应用层
// ==========================================
// 职责: 组装仓储、引擎与API,交给调用方持有
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
