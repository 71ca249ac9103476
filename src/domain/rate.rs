// ==========================================
// 设备成本报价系统 - 汇率报价
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 汇率来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateOrigin {
    Live,                       // 本次实时获取
    Cached,                     // 命中缓存
    Fallback { reason: String }, // 获取失败, 使用兜底常量
}

/// 汇率报价: 外币 → 本币
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    pub rate: f64,
    pub origin: RateOrigin,
    pub fetched_at: DateTime<Utc>,
}

impl RateQuote {
    pub fn live(rate: f64) -> Self {
        Self {
            rate,
            origin: RateOrigin::Live,
            fetched_at: Utc::now(),
        }
    }

    pub fn fallback(rate: f64, reason: impl Into<String>) -> Self {
        Self {
            rate,
            origin: RateOrigin::Fallback {
                reason: reason.into(),
            },
            fetched_at: Utc::now(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, RateOrigin::Fallback { .. })
    }
}
