// ==========================================
// 订单报表核心 - 导入层
// ==========================================
// 职责: 外部订单文件导入,校验后写入仓储
// 支持: CSV, XML
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod order_importer;
pub mod order_importer_trait;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{parser_for, CsvParser, XmlParser};
pub use order_importer::{validate_source, OrderImporter};

// 重导出 Trait 接口
pub use order_importer_trait::{RawRecord, RawRecordIter, RecordParser};
