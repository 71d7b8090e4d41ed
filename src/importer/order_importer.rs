// ==========================================
// 订单报表核心 - 订单导入管道
// ==========================================
// 职责: 驱动解析器 → 订单模型校验 → 分类接受/跳过 → 落库
// 流程: 解析 → 校验 → 汇总 → 落库（单文件事务）
// 说明: 行级校验失败不会中断管道，以 RejectedLine 形式返回
// ==========================================

use crate::domain::{
    BatchSummary, FileOutcome, IngestResult, Order, RejectedLine, SourceFormat, REJECT_REASON,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::parser_for;
use crate::importer::order_importer_trait::RecordParser;
use crate::repository::{OrderRepository, RepositoryResult};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// OrderImporter - 订单导入器
// ==========================================
pub struct OrderImporter {
    repo: Arc<dyn OrderRepository>,
}

impl OrderImporter {
    /// 创建新的 OrderImporter 实例
    ///
    /// # 参数
    /// - repo: 订单仓储（由调用方创建并持有生命周期）
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    /// 导入单个源（按格式选择解析器）
    ///
    /// # 参数
    /// - source_name: 源名称（用于提示信息）
    /// - source: 文件内容
    /// - format: 已识别的格式
    ///
    /// # 返回
    /// - Ok(IngestResult): 接受数量 + 跳过行列表
    /// - Err: 文档无法解析 / 落库失败（仅终止当前文件）
    pub fn ingest(
        &self,
        source_name: &str,
        source: &[u8],
        format: SourceFormat,
    ) -> ImportResult<IngestResult> {
        let parser = parser_for(format);
        self.ingest_with(source_name, source, parser.as_ref())
    }

    /// 使用指定解析器导入单个源
    #[instrument(skip(self, source, parser), fields(format = %parser.format()))]
    pub fn ingest_with(
        &self,
        source_name: &str,
        source: &[u8],
        parser: &dyn RecordParser,
    ) -> ImportResult<IngestResult> {
        let (result, orders) = validate_source(source_name, source, parser)?;

        // 文件整体解析完成后再落库，保证失败文件不留下部分记录
        self.repo.insert_batch(&orders)?;

        info!(
            accepted = result.accepted,
            rejected = result.rejected_lines.len(),
            "文件导入完成"
        );
        Ok(result)
    }

    /// 从文件路径导入（按扩展名识别格式）
    pub fn ingest_file(&self, path: &Path) -> ImportResult<IngestResult> {
        let format = detect_format(path)?;
        let bytes = std::fs::read(path)?;
        self.ingest(&file_name_of(path), &bytes, format)
    }

    /// 批量导入多个文件
    ///
    /// # 说明
    /// - 按调用方给定顺序逐个处理，单个文件失败不影响后续文件
    /// - 先清空仓储再装入新批次；清空与装入在同一事务内完成，
    ///   读取方看不到“已清空、未装完”的中间状态
    ///
    /// # 返回
    /// - Ok(BatchSummary): 每个文件的结果 + 批次信息
    /// - Err: 仓储替换失败
    #[instrument(skip(self, paths), fields(batch_id = tracing::field::Empty, files = paths.len()))]
    pub fn ingest_batch<P: AsRef<Path>>(&self, paths: &[P]) -> RepositoryResult<BatchSummary> {
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());
        let started_at = Utc::now();

        let mut files = Vec::with_capacity(paths.len());
        let mut accepted_orders = Vec::new();

        for path in paths {
            let path = path.as_ref();
            let file_name = file_name_of(path);

            match read_and_validate(path, &file_name) {
                Ok((result, orders)) => {
                    debug!(file = %file_name, accepted = orders.len(), "文件校验完成");
                    accepted_orders.extend(orders);
                    files.push(FileOutcome::ingested(file_name, result));
                }
                Err(e) => {
                    warn!(file = %file_name, error = %e, "文件导入失败");
                    files.push(FileOutcome::failed(file_name, e.file_status(), e.to_string()));
                }
            }
        }

        let inserted = self.repo.replace_all(&accepted_orders)?;
        let summary = BatchSummary {
            batch_id,
            started_at,
            files,
        };

        info!(
            inserted = inserted,
            any_file_good = summary.any_file_good(),
            "批次导入完成"
        );
        Ok(summary)
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 解析并校验一个源，不落库
///
/// # 返回
/// - Ok((IngestResult, Vec<Order>)): 汇总 + 按出现顺序排列的已接受订单
/// - Err: 文件级错误
pub fn validate_source(
    source_name: &str,
    source: &[u8],
    parser: &dyn RecordParser,
) -> ImportResult<(IngestResult, Vec<Order>)> {
    let mut result = IngestResult::new(source_name, parser.format());
    let mut orders = Vec::new();

    for raw in parser.parse(source)? {
        let raw = raw?;
        match Order::parse_fields(&raw.fields) {
            Ok(order) => orders.push(order),
            Err(e) => {
                debug!(position = raw.position, error = %e, "记录校验失败，跳过");
                result.rejected_lines.push(RejectedLine {
                    position: raw.position,
                    line: raw.descriptor,
                    reason: REJECT_REASON.to_string(),
                    detail: e.to_string(),
                });
            }
        }
    }

    result.accepted = orders.len();
    Ok((result, orders))
}

fn detect_format(path: &Path) -> ImportResult<SourceFormat> {
    SourceFormat::from_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();
        ImportError::UnsupportedFormat(ext)
    })
}

fn read_and_validate(path: &Path, file_name: &str) -> ImportResult<(IngestResult, Vec<Order>)> {
    let format = detect_format(path)?;
    let bytes = std::fs::read(path)?;
    let parser = parser_for(format);
    validate_source(file_name, &bytes, parser.as_ref())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileStatus;
    use crate::importer::file_parser::{CsvParser, XmlParser};
    use crate::repository::MemoryOrderRepository;

    const HEADER: &str = "Client_Id,Request_Id,Name,Quantity,Price";

    fn importer() -> (OrderImporter, Arc<MemoryOrderRepository>) {
        let repo = Arc::new(MemoryOrderRepository::new());
        (OrderImporter::new(repo.clone()), repo)
    }

    #[test]
    fn test_ingest_csv_accepts_and_rejects() {
        let (importer, repo) = importer();
        let input = format!("{}\nAB,1,Widget,2,10.00\nAB,x,Widget,2,10.00\nCD,2,Gadget,1,5.50\n", HEADER);

        let result = importer.ingest("orders.csv", input.as_bytes(), SourceFormat::Csv).unwrap();

        assert_eq!(result.accepted, 2);
        assert_eq!(result.rejected_lines.len(), 1);
        assert_eq!(result.rejected_lines[0].line, "AB,x,Widget,2,10.00");
        assert_eq!(result.rejected_lines[0].reason, "wrong format");
        assert_eq!(result.rejected_lines[0].position, 3);
        assert_eq!(result.status(), FileStatus::Loaded);
        assert_eq!(repo.find_all().unwrap().len(), 2);
    }

    #[test]
    fn test_ingest_header_and_blank_lines_only() {
        let (importer, repo) = importer();
        let input = format!("{}\n\n\n", HEADER);

        let result = importer.ingest_with("empty.csv", input.as_bytes(), &CsvParser).unwrap();

        assert_eq!(result.accepted, 0);
        assert!(result.rejected_lines.is_empty());
        assert_eq!(result.status(), FileStatus::NoUsableData);
        assert!(repo.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_ingest_xml_missing_quantity_is_rejected() {
        let (importer, repo) = importer();
        let input = "<requests><request><clientId>AB</clientId><requestId>1</requestId>\
                     <name>Widget</name><price>10.00</price></request></requests>";

        let result = importer.ingest_with("orders.xml", input.as_bytes(), &XmlParser).unwrap();

        assert_eq!(result.accepted, 0);
        assert_eq!(result.rejected_lines.len(), 1);
        assert_eq!(result.rejected_lines[0].line, "AB,1,Widget,,10.00");
        assert!(repo.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_xml_inserts_nothing() {
        let (importer, repo) = importer();
        let input = "<requests><request><clientId>AB</clientId>";

        let err = importer.ingest("bad.xml", input.as_bytes(), SourceFormat::Xml).unwrap_err();

        assert_eq!(err.file_status(), FileStatus::Malformed);
        assert!(repo.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_utf8_line_is_rejected_alone() {
        let (importer, repo) = importer();
        let mut input = format!("{}\nAB,1,Widget,2,10.00\nCD,2,G", HEADER).into_bytes();
        input.push(0xff);
        input.extend_from_slice(b"x,1,5.50\nEF,3,Bolt,1,1.00\n");

        let result = importer.ingest("orders.csv", &input, SourceFormat::Csv).unwrap();

        assert_eq!(result.accepted, 2);
        assert_eq!(result.rejected_lines.len(), 1);
        assert_eq!(result.rejected_lines[0].position, 3);
        assert_eq!(result.status(), FileStatus::Loaded);
        assert_eq!(repo.find_all().unwrap().len(), 2);
    }

    #[test]
    fn test_content_after_root_inserts_nothing() {
        let (importer, repo) = importer();
        let valid = "<requests><request><clientId>AB</clientId><requestId>1</requestId>\
                     <name>Widget</name><quantity>2</quantity><price>10.00</price></request></requests>";

        for input in [format!("{}<junk/>", valid), format!("garbage text{}", valid)] {
            let err = importer.ingest("bad.xml", input.as_bytes(), SourceFormat::Xml).unwrap_err();
            assert_eq!(err.file_status(), FileStatus::Malformed);
        }
        assert!(repo.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_detect_format_rejects_unknown_extension() {
        assert!(matches!(
            detect_format(Path::new("orders.txt")),
            Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"
        ));
    }
}
