// ==========================================
// 报表API
// ==========================================
// 职责: 报表生成、会话内重复判定、文本输出与导出
// 说明: 相等的报表（名称 + 数据）在同一会话内只保留一份
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{Report, ReportKind, ReportParams};
use crate::engine::{ReportEngine, ReportSerializer};
use crate::repository::OrderRepository;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

// ==========================================
// ReportHistory - 会话报表历史
// ==========================================
#[derive(Debug, Default)]
pub struct ReportHistory {
    reports: Mutex<Vec<Report>>,
}

impl ReportHistory {
    fn lock(&self) -> ApiResult<MutexGuard<'_, Vec<Report>>> {
        self.reports
            .lock()
            .map_err(|e| ApiError::InternalError(format!("报表历史锁获取失败: {}", e)))
    }

    /// 记录新报表；已存在相等报表时拒绝
    pub fn record(&self, report: Report) -> ApiResult<()> {
        let mut reports = self.lock()?;
        if reports.contains(&report) {
            return Err(ApiError::DuplicateReport(report.name().to_string()));
        }
        reports.push(report);
        Ok(())
    }

    /// 按生成顺序的报表副本
    pub fn snapshot(&self) -> ApiResult<Vec<Report>> {
        Ok(self.lock()?.clone())
    }

    pub fn clear(&self) -> ApiResult<()> {
        self.lock()?.clear();
        Ok(())
    }
}

/// 报表API
pub struct ReportApi {
    engine: ReportEngine,
    history: Arc<ReportHistory>,
    export_dir: PathBuf,
}

impl ReportApi {
    /// 创建新的ReportApi实例
    ///
    /// # 参数
    /// - repo: 订单仓储
    /// - history: 会话报表历史（与 ImportApi 共享）
    /// - export_dir: 默认导出目录
    pub fn new(
        repo: Arc<dyn OrderRepository>,
        history: Arc<ReportHistory>,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            engine: ReportEngine::new(repo),
            history,
            export_dir,
        }
    }

    /// 可选报表类型（选择框顺序）
    pub fn report_kinds(&self) -> &'static [ReportKind] {
        &ReportKind::ALL
    }

    /// 生成报表并记入会话历史
    ///
    /// # 返回
    /// - Ok(Report): 新报表
    /// - Err(ApiError::DuplicateReport): 会话内已有相等报表，原报表保留
    /// - Err(ApiError::InvalidInput): clientId 过滤值为空
    pub fn generate(&self, params: &ReportParams) -> ApiResult<Report> {
        if params.client_id().is_some_and(|id| id.trim().is_empty()) {
            return Err(ApiError::InvalidInput("clientId 过滤值不能为空".to_string()));
        }

        let report = self.engine.generate(params)?;
        if let Err(e) = self.history.record(report.clone()) {
            warn!(report = %report.name(), "重复报表请求被拒绝");
            return Err(e);
        }

        info!(report = %report.name(), "报表已生成");
        Ok(report)
    }

    /// 会话内已生成的报表（生成顺序）
    pub fn history(&self) -> ApiResult<Vec<Report>> {
        self.history.snapshot()
    }

    pub fn clear_history(&self) -> ApiResult<()> {
        self.history.clear()
    }

    /// 规范文本（屏幕显示与导出一致）
    pub fn serialize(&self, report: &Report) -> String {
        ReportSerializer::serialize(report)
    }

    /// 导出到指定目录（None 时使用配置的导出目录）
    ///
    /// # 返回
    /// - Ok(PathBuf): 实际写出的文件路径
    pub fn export(&self, report: &Report, dir: Option<&Path>) -> ApiResult<PathBuf> {
        let dir = dir.unwrap_or(self.export_dir.as_path());
        let path = dir.join(ReportSerializer::suggested_file_name(report));

        ReportSerializer::export(report, &path)
            .map_err(|e| ApiError::ExportError(format!("{}: {}", path.display(), e)))?;
        Ok(path)
    }
}
