// ==========================================
// 订单导入API
// ==========================================
// 职责: 封装订单导入与订单查询（供界面等调用方使用）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::report_api::ReportHistory;
use crate::domain::{BatchSummary, IngestResult, Order, SourceFormat};
use crate::importer::OrderImporter;
use crate::repository::OrderRepository;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 导入API
pub struct ImportApi {
    importer: OrderImporter,
    repo: Arc<dyn OrderRepository>,
    history: Arc<ReportHistory>,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    ///
    /// # 参数
    /// - repo: 订单仓储
    /// - history: 会话报表历史（加载新批次时清空）
    pub fn new(repo: Arc<dyn OrderRepository>, history: Arc<ReportHistory>) -> Self {
        Self {
            importer: OrderImporter::new(repo.clone()),
            repo,
            history,
        }
    }

    /// 导入单个源（追加到当前订单集合）
    ///
    /// # 返回
    /// - Ok(IngestResult): 接受数量 + 跳过行
    /// - Err(ApiError::Import): 文档无法解析，该源不产生任何订单
    pub fn ingest(
        &self,
        source_name: &str,
        bytes: &[u8],
        format: SourceFormat,
    ) -> ApiResult<IngestResult> {
        Ok(self.importer.ingest(source_name, bytes, format)?)
    }

    /// 加载一批文件，替换当前订单集合
    ///
    /// # 说明
    /// - 文件按给定顺序处理，单个文件失败不影响其他文件
    /// - 会话报表历史随之清空
    pub fn load_files<P: AsRef<Path>>(&self, paths: &[P]) -> ApiResult<BatchSummary> {
        if paths.is_empty() {
            return Err(ApiError::InvalidInput("未选择任何文件".to_string()));
        }

        let summary = self.importer.ingest_batch(paths)?;
        self.history.clear()?;

        info!(
            batch_id = %summary.batch_id,
            total_accepted = summary.total_accepted(),
            "批次加载完成"
        );
        Ok(summary)
    }

    /// 全部订单（插入顺序）
    pub fn list_orders(&self) -> ApiResult<Vec<Order>> {
        Ok(self.repo.find_all()?)
    }

    /// 去重并升序排列的 clientId（用于过滤选择框）
    pub fn client_ids(&self) -> ApiResult<Vec<String>> {
        Ok(self.repo.distinct_client_ids()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Report, ReportData, ScalarValue};
    use crate::repository::MemoryOrderRepository;

    fn api() -> (ImportApi, Arc<ReportHistory>) {
        let history = Arc::new(ReportHistory::default());
        let api = ImportApi::new(Arc::new(MemoryOrderRepository::new()), history.clone());
        (api, history)
    }

    #[test]
    fn test_ingest_appends_and_lists() {
        let (api, _) = api();
        let csv = "h\nCD,2,Gadget,1,5.50\nAB,1,Widget,2,10.00\nAB,3,Bolt,1,0.10\n";

        let result = api.ingest("orders.csv", csv.as_bytes(), SourceFormat::Csv).unwrap();

        assert_eq!(result.accepted, 3);
        assert_eq!(api.list_orders().unwrap()[0].client_id(), "CD");
        assert_eq!(api.client_ids().unwrap(), vec!["AB", "CD"]);
    }

    #[test]
    fn test_load_files_requires_paths() {
        let (api, _) = api();
        let paths: Vec<&Path> = Vec::new();
        assert!(matches!(api.load_files(&paths), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_load_files_clears_history() {
        let (api, history) = api();
        history
            .record(Report::new("Total amount of orders", ReportData::Scalar(ScalarValue::Count(0))))
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        std::fs::write(&path, "h\nAB,1,Widget,2,10.00\n").unwrap();

        let summary = api.load_files(&[&path]).unwrap();

        assert!(summary.any_file_good());
        assert!(history.snapshot().unwrap().is_empty());
    }
}
