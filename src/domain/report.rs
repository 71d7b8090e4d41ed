// ==========================================
// 订单报表核心 - 报表领域对象
// ==========================================
// 职责: 报表请求参数 / 报表结果（标量 或 记录列表）
// 相等性: 名称 + 数据均相等（用于会话内重复报表判定）
// ==========================================

use crate::domain::order::Order;
use crate::domain::types::ReportKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ReportParams - 报表请求参数
// ==========================================
// 不可变: (报表类型, 可选 clientId 过滤值)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportParams {
    kind: ReportKind,
    client_id: Option<String>,
}

impl ReportParams {
    pub fn new(kind: ReportKind, client_id: Option<String>) -> Self {
        Self { kind, client_id }
    }

    /// 不过滤，覆盖全部订单
    pub fn all(kind: ReportKind) -> Self {
        Self::new(kind, None)
    }

    /// 仅统计指定 clientId 的订单
    pub fn for_client(kind: ReportKind, client_id: impl Into<String>) -> Self {
        Self::new(kind, Some(client_id.into()))
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// 报表名称: 显示名，过滤时追加 " (clientId: <值>)"
    pub fn report_name(&self) -> String {
        match &self.client_id {
            Some(id) => format!("{} (clientId: {})", self.kind.display_name(), id),
            None => self.kind.display_name().to_string(),
        }
    }
}

// ==========================================
// ScalarValue - 标量报表值
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ScalarValue {
    /// 计数
    Count(i64),
    /// 金额（两位小数）
    Amount(Decimal),
    /// 匹配集合为空时无法求值（平均价格）
    NoData,
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Count(count) => write!(f, "{}", count),
            ScalarValue::Amount(amount) => write!(f, "{}", amount),
            ScalarValue::NoData => write!(f, "no data"),
        }
    }
}

// ==========================================
// ReportData - 报表数据（标签联合）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", content = "data", rename_all = "snake_case")]
pub enum ReportData {
    Scalar(ScalarValue),
    List(Vec<Order>),
}

// ==========================================
// Report - 报表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    name: String,
    data: ReportData,
}

impl Report {
    pub fn new(name: impl Into<String>, data: ReportData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ReportData {
        &self.data
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_name_with_filter() {
        assert_eq!(
            ReportParams::all(ReportKind::TotalPrice).report_name(),
            "Total price of orders"
        );
        assert_eq!(
            ReportParams::for_client(ReportKind::OrdersList, "AB").report_name(),
            "List of all orders (clientId: AB)"
        );
    }

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(ScalarValue::Count(0).to_string(), "0");
        assert_eq!(ScalarValue::Amount(Decimal::new(1550, 2)).to_string(), "15.50");
        assert_eq!(ScalarValue::Amount(Decimal::new(0, 2)).to_string(), "0.00");
        assert_eq!(ScalarValue::NoData.to_string(), "no data");
    }

    #[test]
    fn test_report_equality() {
        let a = Report::new("Total amount of orders", ReportData::Scalar(ScalarValue::Count(2)));
        let b = Report::new("Total amount of orders", ReportData::Scalar(ScalarValue::Count(2)));
        let c = Report::new("Total amount of orders", ReportData::Scalar(ScalarValue::Count(3)));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
