// ==========================================
// 设备成本报价系统 - 汇率层错误类型
// ==========================================
// 红线: 汇率错误只在本层内部流转, 由缓存提供者转为兜底汇率
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RateError {
    #[error("HTTP 请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("汇率服务返回状态码 {0}")]
    Status(u16),

    #[error("响应中缺少币种 {0}")]
    MissingCurrency(String),

    #[error("汇率非法: {0}")]
    InvalidRate(f64),

    #[error("汇率获取超时 ({0} ms)")]
    Timeout(u64),

    #[error("汇率源不可用: {0}")]
    Unavailable(String),
}

pub type RateResult<T> = Result<T, RateError>;
