// ==========================================
// 订单报表核心 - 记录解析 Trait
// ==========================================
// 职责: 定义格式解析器接口（不包含实现）
// 约定: 所有解析器按规范字段顺序产出原始字段
// ==========================================

use crate::domain::SourceFormat;
use crate::importer::error::ImportResult;

// ==========================================
// RawRecord - 解析器产出的原始字段元组
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// CSV: 物理行号；XML: 元素序号（从 1 开始）
    pub position: usize,
    /// 原始字段（规范顺序，数量不做保证）
    pub fields: Vec<String>,
    /// 用于跳过提示的原始行/元素渲染
    pub descriptor: String,
}

/// 惰性原始记录序列（消费后不可重启）
pub type RawRecordIter<'a> = Box<dyn Iterator<Item = ImportResult<RawRecord>> + 'a>;

// ==========================================
// RecordParser Trait
// ==========================================
// 用途: 单一输入格式的解析
// 实现者: CsvParser, XmlParser
pub trait RecordParser: Send + Sync {
    /// 解析器对应的输入格式
    fn format(&self) -> SourceFormat;

    /// 解析字节源为原始记录序列
    ///
    /// # 参数
    /// - source: 完整文件内容（UTF-8）
    ///
    /// # 返回
    /// - Ok(RawRecordIter): 原始记录序列；迭代中的 Err 表示文件级错误，应终止该文件
    /// - Err: 文档整体无法解析（只报告一次）
    fn parse<'a>(&self, source: &'a [u8]) -> ImportResult<RawRecordIter<'a>>;
}
