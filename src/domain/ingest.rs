// ==========================================
// 订单报表核心 - 导入结果领域对象
// ==========================================
// 职责: 单文件导入结果 / 被跳过行 / 批次汇总
// 说明: 所有结果以数据形式返回，由调用方决定如何展示
// ==========================================

use crate::domain::types::SourceFormat;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 被跳过行的固定原因
pub const REJECT_REASON: &str = "wrong format";

// ==========================================
// RejectedLine - 被跳过的行/元素
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedLine {
    pub position: usize, // CSV 物理行号 / XML 元素序号（从 1 开始）
    pub line: String,    // 原始行文本或元素渲染
    pub reason: String,  // 固定为 "wrong format"
    pub detail: String,  // 具体校验错误
}

// ==========================================
// FileStatus - 单文件状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileStatus {
    Loaded,            // 至少一条记录入库
    NoUsableData,      // 没有任何可用记录
    Malformed,         // 文档无法解析，整个文件放弃
    Unreadable,        // 文件读取失败
    UnsupportedFormat, // 扩展名不支持
}

// ==========================================
// IngestResult - 单文件导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestResult {
    pub source_name: String,
    pub format: SourceFormat,
    pub accepted: usize,
    pub rejected_lines: Vec<RejectedLine>,
}

impl IngestResult {
    pub fn new(source_name: impl Into<String>, format: SourceFormat) -> Self {
        Self {
            source_name: source_name.into(),
            format,
            accepted: 0,
            rejected_lines: Vec::new(),
        }
    }

    /// accepted == 0 与“部分行被跳过”是两种不同状态
    pub fn status(&self) -> FileStatus {
        if self.accepted == 0 {
            FileStatus::NoUsableData
        } else {
            FileStatus::Loaded
        }
    }

    pub fn is_good(&self) -> bool {
        self.status() == FileStatus::Loaded
    }

    /// 面向用户的逐行提示 + 文件级结论
    pub fn messages(&self) -> Vec<String> {
        let mut messages: Vec<String> = self
            .rejected_lines
            .iter()
            .map(|rejected| format!("Line \"{}\" skipped - {}!", rejected.line, rejected.reason))
            .collect();

        match self.status() {
            FileStatus::Loaded => messages.push(format!(
                "{} file {} loaded successfully!",
                self.format, self.source_name
            )),
            _ => messages.push(format!(
                "No suitable lines found in {} file {}!",
                self.format, self.source_name
            )),
        }
        messages
    }
}

// ==========================================
// FileOutcome - 批次中单个文件的结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub file_name: String,
    pub status: FileStatus,
    pub result: Option<IngestResult>, // 解析完成时存在
    pub error: Option<String>,        // 文件级失败原因
}

impl FileOutcome {
    pub fn ingested(file_name: impl Into<String>, result: IngestResult) -> Self {
        Self {
            file_name: file_name.into(),
            status: result.status(),
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(file_name: impl Into<String>, status: FileStatus, error: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            status,
            result: None,
            error: Some(error.into()),
        }
    }

    pub fn is_good(&self) -> bool {
        self.status == FileStatus::Loaded
    }

    pub fn accepted(&self) -> usize {
        self.result.as_ref().map_or(0, |r| r.accepted)
    }

    pub fn messages(&self) -> Vec<String> {
        match (&self.result, self.status) {
            (Some(result), _) => result.messages(),
            (None, FileStatus::UnsupportedFormat) => {
                vec![format!("Wrong file type of file {}", self.file_name)]
            }
            (None, FileStatus::Unreadable) => {
                vec![format!("Couldn't read the file {}!", self.file_name)]
            }
            (None, _) => vec![format!("Couldn't parse the file {}!", self.file_name)],
        }
    }
}

// ==========================================
// BatchSummary - 批次汇总
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub batch_id: String,
    pub started_at: DateTime<Utc>,
    pub files: Vec<FileOutcome>,
}

impl BatchSummary {
    /// 任一文件成功即为 true（调用方据此启用依赖数据的界面）
    pub fn any_file_good(&self) -> bool {
        self.files.iter().any(FileOutcome::is_good)
    }

    pub fn total_accepted(&self) -> usize {
        self.files.iter().map(FileOutcome::accepted).sum()
    }

    pub fn messages(&self) -> Vec<String> {
        self.files.iter().flat_map(FileOutcome::messages).collect()
    }
}
