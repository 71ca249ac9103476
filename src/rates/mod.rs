// ==========================================
// 设备成本报价系统 - 汇率层
// ==========================================
// 职责: 外币 → 本币汇率获取 (异步、限时、缓存、兜底)
// 红线: 本层是整个系统唯一会挂起的位置
// ==========================================

pub mod error;
pub mod provider;
pub mod source;

pub use error::{RateError, RateResult};
pub use provider::{CachedRateProvider, RateProviderConfig};
pub use source::{
    ExchangeRateSource, HttpExchangeRateSource, StaticRateSource, DEFAULT_RATE_API_URL,
};
