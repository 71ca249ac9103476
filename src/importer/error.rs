// ==========================================
// 设备成本报价系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv/.json）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(#[from] csv::Error),

    #[error("JSON 解析失败: {0}")]
    JsonParseError(#[from] serde_json::Error),

    // ===== 数据映射错误 =====
    #[error("字段映射失败 (行 {row}): {message}")]
    FieldMappingError { row: usize, message: String },

    #[error("类型转换失败 (行 {row}, 字段 {field}): {message}")]
    TypeConversionError {
        row: usize,
        field: String,
        message: String,
    },

    // ===== 目录校验错误 =====
    #[error("记录非法 (行 {row}): {source}")]
    InvalidRecord {
        row: usize,
        #[source]
        source: EngineError,
    },

    #[error("设备 ID 重复 (行 {row}): {id}")]
    DuplicateId { row: usize, id: String },

    // ===== 数据库错误 =====
    #[error("仓储写入失败: {0}")]
    Repository(#[from] RepositoryError),
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
