// ==========================================
// 订单报表核心 - 订单仓储 Trait
// ==========================================
// 职责: 定义订单存储接口（不包含业务逻辑）
// 红线: 插入不去重；列表按插入顺序；清空必须整体完成
// ==========================================

use crate::domain::{Order, ReportParams};
use crate::repository::error::RepositoryResult;

// ==========================================
// OrderFilter - 查询过滤条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub client_id: Option<String>,
}

impl OrderFilter {
    /// 不过滤
    pub fn all() -> Self {
        Self::default()
    }

    /// 按 clientId 精确匹配
    pub fn by_client(client_id: impl Into<String>) -> Self {
        Self {
            client_id: Some(client_id.into()),
        }
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.client_id
            .as_deref()
            .map_or(true, |id| order.client_id() == id)
    }
}

impl From<&ReportParams> for OrderFilter {
    fn from(params: &ReportParams) -> Self {
        Self {
            client_id: params.client_id().map(str::to_string),
        }
    }
}

// ==========================================
// OrderRepository Trait
// ==========================================
// 实现者: SqliteOrderRepository（内嵌查询执行器）, MemoryOrderRepository
pub trait OrderRepository: Send + Sync {
    /// 插入单条订单
    ///
    /// # 返回
    /// - Ok(i64): 插入顺序代理键
    fn insert(&self, order: &Order) -> RepositoryResult<i64>;

    /// 批量插入（事务化，整体成功或整体回滚）
    fn insert_batch(&self, orders: &[Order]) -> RepositoryResult<usize>;

    /// 清空全部订单并重置代理键计数
    fn clear(&self) -> RepositoryResult<()>;

    /// 清空后装入新订单（对读取方原子可见）
    fn replace_all(&self, orders: &[Order]) -> RepositoryResult<usize>;

    /// 全部订单（插入顺序）
    fn find_all(&self) -> RepositoryResult<Vec<Order>> {
        self.find_by(&OrderFilter::all())
    }

    /// 按过滤条件查询（插入顺序）
    fn find_by(&self, filter: &OrderFilter) -> RepositoryResult<Vec<Order>>;

    /// 去重后的 clientId（升序）
    fn distinct_client_ids(&self) -> RepositoryResult<Vec<String>>;

    /// 匹配订单数量
    fn count(&self, filter: &OrderFilter) -> RepositoryResult<i64>;

    /// 匹配订单价格总和（分）
    fn sum_price_cents(&self, filter: &OrderFilter) -> RepositoryResult<i64>;

    /// 任意谓词查询（插入顺序）
    fn query(&self, predicate: &dyn Fn(&Order) -> bool) -> RepositoryResult<Vec<Order>> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|order| predicate(order))
            .collect())
    }
}
