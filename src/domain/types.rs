// ==========================================
// 订单报表核心 - 领域类型定义
// ==========================================
// 职责: 字段枚举 / 输入格式 / 报表类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ==========================================
// 订单字段 (Order Field)
// ==========================================
// 顺序固定: clientId, requestId, name, quantity, price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderField {
    ClientId,
    RequestId,
    Name,
    Quantity,
    Price,
}

impl OrderField {
    /// 规范字段顺序（CSV 列顺序 / XML 子标签读取顺序）
    pub const ALL: [OrderField; 5] = [
        OrderField::ClientId,
        OrderField::RequestId,
        OrderField::Name,
        OrderField::Quantity,
        OrderField::Price,
    ];

    /// 字段个数
    pub const COUNT: usize = Self::ALL.len();

    /// XML 子标签名
    pub fn tag_name(&self) -> &'static str {
        match self {
            OrderField::ClientId => "clientId",
            OrderField::RequestId => "requestId",
            OrderField::Name => "name",
            OrderField::Quantity => "quantity",
            OrderField::Price => "price",
        }
    }

    /// 报表表头列名
    pub fn column_name(&self) -> &'static str {
        match self {
            OrderField::ClientId => "Client_Id",
            OrderField::RequestId => "Request_Id",
            OrderField::Name => "Name",
            OrderField::Quantity => "Quantity",
            OrderField::Price => "Price",
        }
    }

    /// 按标签名查找字段（区分大小写）
    pub fn from_tag_name(tag: &[u8]) -> Option<OrderField> {
        Self::ALL
            .into_iter()
            .find(|field| field.tag_name().as_bytes() == tag)
    }

    /// 字段在规范顺序中的位置
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag_name())
    }
}

// ==========================================
// 输入格式 (Source Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceFormat {
    Csv, // 逗号分隔文本
    Xml, // 嵌套标记
}

impl SourceFormat {
    /// 按扩展名识别格式（大小写不敏感）
    ///
    /// # 返回
    /// - Some(SourceFormat): .csv / .xml
    /// - None: 其他扩展名或无扩展名
    pub fn from_path(path: &Path) -> Option<SourceFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(SourceFormat::Csv),
            "xml" => Some(SourceFormat::Xml),
            _ => None,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Csv => write!(f, "CSV"),
            SourceFormat::Xml => write!(f, "XML"),
        }
    }
}

// ==========================================
// 报表类型 (Report Kind)
// ==========================================
// 固定目录，每种类型对应一个确定的查询
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    OrdersAmount, // 订单数量
    TotalPrice,   // 价格总和
    OrdersList,   // 订单列表
    AveragePrice, // 平均价格
}

impl ReportKind {
    /// 全部报表类型（选择框顺序）
    pub const ALL: [ReportKind; 4] = [
        ReportKind::OrdersAmount,
        ReportKind::TotalPrice,
        ReportKind::OrdersList,
        ReportKind::AveragePrice,
    ];

    /// 报表显示名
    pub fn display_name(&self) -> &'static str {
        match self {
            ReportKind::OrdersAmount => "Total amount of orders",
            ReportKind::TotalPrice => "Total price of orders",
            ReportKind::OrdersList => "List of all orders",
            ReportKind::AveragePrice => "Average price of order",
        }
    }

    /// 结果是否为记录列表
    pub fn is_listing(&self) -> bool {
        matches!(self, ReportKind::OrdersList)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
