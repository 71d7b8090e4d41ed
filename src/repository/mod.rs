// ==========================================
// 订单报表核心 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供订单存储与查询接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod memory_order_repo;
pub mod order_repo;
pub mod order_repo_impl;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use memory_order_repo::MemoryOrderRepository;
pub use order_repo::{OrderFilter, OrderRepository};
pub use order_repo_impl::SqliteOrderRepository;
