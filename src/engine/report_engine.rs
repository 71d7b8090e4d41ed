// ==========================================
// 订单报表核心 - 报表引擎
// ==========================================
// 职责: 固定报表目录，对仓储当前内容求值
// 输入: ReportParams（类型 + 可选 clientId）
// 输出: Report（标量 或 记录列表）
// 红线: Engine 不拼 SQL，查询全部经由 OrderRepository
// ==========================================

use crate::domain::{Report, ReportData, ReportKind, ReportParams, ScalarValue};
use crate::repository::{OrderFilter, OrderRepository, RepositoryResult};
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use tracing::{debug, instrument};

/// 金额小数位数
pub const AMOUNT_SCALE: u32 = 2;

// ==========================================
// ReportEngine - 报表引擎
// ==========================================
pub struct ReportEngine {
    repo: Arc<dyn OrderRepository>,
}

impl ReportEngine {
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    /// 生成报表
    ///
    /// # 参数
    /// - params: 报表类型 + 可选 clientId 过滤
    ///
    /// # 返回
    /// - Ok(Report): 名称由参数决定，相同参数 + 相同仓储内容得到相等的报表
    /// - Err: 仓储查询失败 / 求和溢出
    #[instrument(skip(self), fields(kind = ?params.kind(), client_id = ?params.client_id()))]
    pub fn generate(&self, params: &ReportParams) -> RepositoryResult<Report> {
        let filter = OrderFilter::from(params);

        let data = match params.kind() {
            ReportKind::OrdersAmount => {
                ReportData::Scalar(ScalarValue::Count(self.repo.count(&filter)?))
            }
            ReportKind::TotalPrice => {
                let cents = self.repo.sum_price_cents(&filter)?;
                ReportData::Scalar(ScalarValue::Amount(cents_to_amount(cents)))
            }
            ReportKind::OrdersList => ReportData::List(self.repo.find_by(&filter)?),
            ReportKind::AveragePrice => {
                let count = self.repo.count(&filter)?;
                let cents = self.repo.sum_price_cents(&filter)?;
                ReportData::Scalar(average_amount(cents, count))
            }
        };

        debug!("报表生成完成");
        Ok(Report::new(params.report_name(), data))
    }
}

fn cents_to_amount(cents: i64) -> Decimal {
    Decimal::new(cents, AMOUNT_SCALE)
}

/// 平均价格，四舍五入到两位小数；空集合返回 NoData
fn average_amount(sum_cents: i64, count: i64) -> ScalarValue {
    if count == 0 {
        return ScalarValue::NoData;
    }

    let mut average = (cents_to_amount(sum_cents) / Decimal::from(count))
        .round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    average.rescale(AMOUNT_SCALE);
    ScalarValue::Amount(average)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Order;
    use crate::repository::MemoryOrderRepository;

    fn engine_with(rows: &[[&str; 5]]) -> ReportEngine {
        let repo = Arc::new(MemoryOrderRepository::new());
        for row in rows {
            repo.insert(&Order::parse_fields(row).unwrap()).unwrap();
        }
        ReportEngine::new(repo)
    }

    fn scalar(report: &Report) -> String {
        match report.data() {
            ReportData::Scalar(value) => value.to_string(),
            ReportData::List(_) => panic!("expected scalar report"),
        }
    }

    #[test]
    fn test_empty_store_scalars() {
        let engine = engine_with(&[]);

        let amount = engine.generate(&ReportParams::all(ReportKind::OrdersAmount)).unwrap();
        assert_eq!(amount.data(), &ReportData::Scalar(ScalarValue::Count(0)));
        assert_eq!(amount.name(), "Total amount of orders");

        let total = engine.generate(&ReportParams::all(ReportKind::TotalPrice)).unwrap();
        assert_eq!(scalar(&total), "0.00");

        let average = engine.generate(&ReportParams::all(ReportKind::AveragePrice)).unwrap();
        assert_eq!(average.data(), &ReportData::Scalar(ScalarValue::NoData));
    }

    #[test]
    fn test_list_filtered_keeps_insertion_order() {
        let engine = engine_with(&[
            ["AB", "1", "Widget", "2", "10.00"],
            ["CD", "2", "Gadget", "1", "5.50"],
            ["AB", "3", "Bolt", "7", "0.10"],
        ]);

        let report = engine
            .generate(&ReportParams::for_client(ReportKind::OrdersList, "AB"))
            .unwrap();

        assert_eq!(report.name(), "List of all orders (clientId: AB)");
        match report.data() {
            ReportData::List(orders) => {
                let ids: Vec<i64> = orders.iter().map(|o| o.request_id()).collect();
                assert_eq!(ids, vec![1, 3]);
            }
            ReportData::Scalar(_) => panic!("expected list report"),
        }
    }

    #[test]
    fn test_total_and_average() {
        let engine = engine_with(&[
            ["AB", "1", "Widget", "2", "10.00"],
            ["AB", "2", "Gadget", "1", "5.50"],
            ["AB", "3", "Bolt", "1", "0.01"],
        ]);

        let total = engine.generate(&ReportParams::all(ReportKind::TotalPrice)).unwrap();
        assert_eq!(scalar(&total), "15.51");

        // 15.51 / 3 = 5.17
        let average = engine.generate(&ReportParams::all(ReportKind::AveragePrice)).unwrap();
        assert_eq!(scalar(&average), "5.17");
    }

    #[test]
    fn test_average_rounds_half_away_from_zero() {
        assert_eq!(average_amount(1001, 2).to_string(), "5.01");
        assert_eq!(average_amount(1000, 2).to_string(), "5.00");
        assert_eq!(average_amount(100, 3).to_string(), "0.33");
        assert_eq!(average_amount(200, 3).to_string(), "0.67");
    }

    #[test]
    fn test_same_params_give_equal_reports() {
        let engine = engine_with(&[["AB", "1", "Widget", "2", "10.00"]]);
        let params = ReportParams::for_client(ReportKind::TotalPrice, "AB");

        assert_eq!(engine.generate(&params).unwrap(), engine.generate(&params).unwrap());
    }

    #[test]
    fn test_unknown_client_filter() {
        let engine = engine_with(&[["AB", "1", "Widget", "2", "10.00"]]);
        let report = engine
            .generate(&ReportParams::for_client(ReportKind::OrdersAmount, "ZZ"))
            .unwrap();
        assert_eq!(scalar(&report), "0");
    }
}
