// ==========================================
// 订单报表核心 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 这里只有文件级错误；行级校验失败以 RejectedLine 数据返回
// ==========================================

use crate::domain::FileStatus;
use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件格式不支持: {0}（仅支持 .csv/.xml）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("XML 解析失败: {0}")]
    XmlParseError(String),

    #[error("文档结构错误: {0}")]
    MalformedSource(String),

    // ===== 数据库错误 =====
    #[error("订单落库失败: {0}")]
    Repository(#[from] RepositoryError),
}

impl ImportError {
    /// 映射为单文件状态
    pub fn file_status(&self) -> FileStatus {
        match self {
            ImportError::UnsupportedFormat(_) => FileStatus::UnsupportedFormat,
            ImportError::FileReadError(_) | ImportError::Repository(_) => FileStatus::Unreadable,
            ImportError::CsvParseError(_)
            | ImportError::XmlParseError(_)
            | ImportError::MalformedSource(_) => FileStatus::Malformed,
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            ImportError::FileReadError(err.to_string())
        } else {
            ImportError::CsvParseError(err.to_string())
        }
    }
}

// 实现 From<quick_xml::Error>
impl From<quick_xml::Error> for ImportError {
    fn from(err: quick_xml::Error) -> Self {
        ImportError::XmlParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
