// ==========================================
// 订单报表核心 - 内存订单仓储
// ==========================================
// 用途: 不依赖 SQLite 的仓储实现，供单元测试与嵌入方使用
// ==========================================

use crate::domain::Order;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::order_repo::{OrderFilter, OrderRepository};
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Store {
    orders: Vec<(i64, Order)>,
    next_id: i64,
}

impl Store {
    fn push(&mut self, order: &Order) -> i64 {
        self.next_id += 1;
        self.orders.push((self.next_id, order.clone()));
        self.next_id
    }

    fn reset(&mut self) {
        self.orders.clear();
        self.next_id = 0;
    }
}

#[derive(Debug, Default)]
pub struct MemoryOrderRepository {
    store: Mutex<Store>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_store(&self) -> RepositoryResult<MutexGuard<'_, Store>> {
        self.store
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl OrderRepository for MemoryOrderRepository {
    fn insert(&self, order: &Order) -> RepositoryResult<i64> {
        Ok(self.get_store()?.push(order))
    }

    fn insert_batch(&self, orders: &[Order]) -> RepositoryResult<usize> {
        let mut store = self.get_store()?;
        for order in orders {
            store.push(order);
        }
        Ok(orders.len())
    }

    fn clear(&self) -> RepositoryResult<()> {
        self.get_store()?.reset();
        Ok(())
    }

    fn replace_all(&self, orders: &[Order]) -> RepositoryResult<usize> {
        let mut store = self.get_store()?;
        store.reset();
        for order in orders {
            store.push(order);
        }
        Ok(orders.len())
    }

    fn find_by(&self, filter: &OrderFilter) -> RepositoryResult<Vec<Order>> {
        let store = self.get_store()?;
        Ok(store
            .orders
            .iter()
            .filter(|(_, order)| filter.matches(order))
            .map(|(_, order)| order.clone())
            .collect())
    }

    fn distinct_client_ids(&self) -> RepositoryResult<Vec<String>> {
        let store = self.get_store()?;
        let ids: BTreeSet<&str> = store
            .orders
            .iter()
            .map(|(_, order)| order.client_id())
            .collect();
        Ok(ids.into_iter().map(str::to_string).collect())
    }

    fn count(&self, filter: &OrderFilter) -> RepositoryResult<i64> {
        let store = self.get_store()?;
        let count = store
            .orders
            .iter()
            .filter(|(_, order)| filter.matches(order))
            .count();
        Ok(count as i64)
    }

    fn sum_price_cents(&self, filter: &OrderFilter) -> RepositoryResult<i64> {
        let store = self.get_store()?;
        store
            .orders
            .iter()
            .filter(|(_, order)| filter.matches(order))
            .try_fold(0i64, |acc, (_, order)| acc.checked_add(order.price_cents()))
            .ok_or_else(|| RepositoryError::Overflow("sum(price_cents)".to_string()))
    }
}
