// ==========================================
// 订单报表核心 - SQLite 订单仓储实现
// ==========================================
// 职责: 以内嵌 SQLite 作为查询执行器（使用 rusqlite）
// 红线: Repository 不含业务规则；所有查询参数化，不拼接用户输入
// ==========================================

use crate::db::{init_schema, open_sqlite_connection, DEFAULT_BUSY_TIMEOUT_MS, IN_MEMORY_DB_PATH};
use crate::domain::Order;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::order_repo::{OrderFilter, OrderRepository};
use rusqlite::{params, Connection, Row, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// ==========================================
// SqliteOrderRepository
// ==========================================
pub struct SqliteOrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteOrderRepository {
    /// 打开（或创建）数据库并初始化 schema
    ///
    /// # 参数
    /// - db_path: 数据库文件路径，":memory:" 表示内存库
    /// - busy_timeout_ms: 锁等待超时
    pub fn new(db_path: &str, busy_timeout_ms: u64) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path, busy_timeout_ms)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 一次性内存库（默认部署形态）
    pub fn in_memory() -> RepositoryResult<Self> {
        Self::new(IN_MEMORY_DB_PATH, DEFAULT_BUSY_TIMEOUT_MS)
    }

    /// 使用共享连接创建实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            init_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn insert_tx(tx: &Transaction, orders: &[Order]) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO orders (client_id, request_id, name, quantity, price_cents)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )?;

        let mut count = 0;
        for order in orders {
            stmt.execute(params![
                order.client_id(),
                order.request_id(),
                order.name(),
                order.quantity(),
                order.price_cents(),
            ])?;
            count += 1;
        }
        Ok(count)
    }

    fn clear_tx(tx: &Transaction) -> RepositoryResult<()> {
        tx.execute("DELETE FROM orders", [])?;
        // 重置 AUTOINCREMENT 计数
        tx.execute("DELETE FROM sqlite_sequence WHERE name = 'orders'", [])?;
        Ok(())
    }

    fn map_row(row: &Row) -> rusqlite::Result<Order> {
        Ok(Order::from_trusted(
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
        ))
    }
}

impl OrderRepository for SqliteOrderRepository {
    fn insert(&self, order: &Order) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO orders (client_id, request_id, name, quantity, price_cents)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                order.client_id(),
                order.request_id(),
                order.name(),
                order.quantity(),
                order.price_cents(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn insert_batch(&self, orders: &[Order]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        let count = Self::insert_tx(&tx, orders)?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        debug!(count, "批量插入订单");
        Ok(count)
    }

    fn clear(&self) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Self::clear_tx(&tx)?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    fn replace_all(&self, orders: &[Order]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Self::clear_tx(&tx)?;
        let count = Self::insert_tx(&tx, orders)?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        debug!(count, "订单集合已替换");
        Ok(count)
    }

    fn find_by(&self, filter: &OrderFilter) -> RepositoryResult<Vec<Order>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT client_id, request_id, name, quantity, price_cents
            FROM orders
            WHERE (?1 IS NULL OR client_id = ?1)
            ORDER BY id
            "#,
        )?;

        let orders = stmt
            .query_map(params![filter.client_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(orders)
    }

    fn distinct_client_ids(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT DISTINCT client_id FROM orders ORDER BY client_id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    fn count(&self, filter: &OrderFilter) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM orders WHERE (?1 IS NULL OR client_id = ?1)",
            params![filter.client_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn sum_price_cents(&self, filter: &OrderFilter) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let sum = conn.query_row(
            "SELECT COALESCE(SUM(price_cents), 0) FROM orders WHERE (?1 IS NULL OR client_id = ?1)",
            params![filter.client_id],
            |row| row.get(0),
        )?;
        Ok(sum)
    }
}
