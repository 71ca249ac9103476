// ==========================================
// 设备成本报价系统 - API层错误类型
// ==========================================
// 职责: 汇总下层错误, 转换为调用方可读的错误消息
// ==========================================

use crate::engine::error::EngineError;
use crate::importer::error::ImportError;
use crate::rates::error::RateError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 业务规则错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ===== 配置错误 (致命) =====
    #[error("配置错误: {0}")]
    Configuration(#[from] EngineError),

    #[error("配置读取失败: {0}")]
    ConfigRead(String),

    // ===== 下层错误 =====
    #[error("数据访问失败: {0}")]
    Repository(#[from] RepositoryError),

    #[error("导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("汇率源初始化失败: {0}")]
    Rate(#[from] RateError),

    #[error("锁获取失败: {0}")]
    LockError(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
