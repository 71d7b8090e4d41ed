// ==========================================
// 订单报表核心 - 报表序列化
// ==========================================
// 职责: 报表 → 规范文本（屏幕显示与文件导出共用同一输出）
// 列表: 表头 + 每行一条订单，末行无换行
// 标量: "<报表名>:" 换行后跟值
// ==========================================

use crate::domain::{OrderField, Report, ReportData};
use std::io;
use std::path::Path;
use tracing::info;

/// 导出文件扩展名
pub const EXPORT_EXTENSION: &str = "csv";

pub struct ReportSerializer;

impl ReportSerializer {
    /// 列表表头: Client_Id,Request_Id,Name,Quantity,Price
    pub fn header() -> String {
        OrderField::ALL
            .iter()
            .map(|field| field.column_name())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn serialize(report: &Report) -> String {
        match report.data() {
            ReportData::List(orders) => {
                let mut lines = Vec::with_capacity(orders.len() + 1);
                lines.push(Self::header());
                lines.extend(orders.iter().map(|order| order.render()));
                lines.join("\n")
            }
            ReportData::Scalar(value) => format!("{}:\n{}", report.name(), value),
        }
    }

    /// 建议导出文件名: 报表名空格替换为 "_" + ".csv"
    pub fn suggested_file_name(report: &Report) -> String {
        format!("{}.{}", report.name().replace(' ', "_"), EXPORT_EXTENSION)
    }

    /// 写出 UTF-8 文本（内容与 serialize 完全一致）
    pub fn export(report: &Report, path: &Path) -> io::Result<()> {
        std::fs::write(path, Self::serialize(report))?;
        info!(report = %report.name(), path = %path.display(), "报表已导出");
        Ok(())
    }
}
