// ==========================================
// 设备成本报价系统 - 汇率缓存提供者
// ==========================================
// 职责: 为汇率源加上超时、TTL 缓存与兜底
// 规则:
// - 缓存命中 → 直接返回 (origin=Cached)
// - 获取成功 → 写入缓存 (origin=Live)
// - 失败/超时/非法值 → 兜底常量 (origin=Fallback), 不写缓存, 下次重试
// 红线: 永远返回一个可用汇率, 不向上传播错误
// ==========================================

use crate::config::settings::PricingSettings;
use crate::domain::rate::{RateOrigin, RateQuote};
use crate::rates::error::RateError;
use crate::rates::source::{validate_rate, ExchangeRateSource};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// 缓存提供者参数
#[derive(Debug, Clone, PartialEq)]
pub struct RateProviderConfig {
    pub from: String,
    pub to: String,
    pub ttl: Duration,
    pub timeout: Duration,
    pub fallback_rate: f64,
}

impl RateProviderConfig {
    pub fn from_settings(settings: &PricingSettings) -> Self {
        Self {
            from: settings.currency_from.clone(),
            to: settings.currency_to.clone(),
            ttl: settings.exchange_rate_cache_ttl(),
            timeout: settings.exchange_rate_timeout(),
            fallback_rate: settings.fallback_exchange_rate,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedRate {
    rate: f64,
    stored_at: Instant,
    fetched_at: DateTime<Utc>,
}

// ==========================================
// CachedRateProvider
// ==========================================
pub struct CachedRateProvider<S: ?Sized> {
    source: Arc<S>,
    config: RateProviderConfig,
    cache: Mutex<Option<CachedRate>>,
}

impl<S> CachedRateProvider<S>
where
    S: ExchangeRateSource + ?Sized,
{
    pub fn new(source: Arc<S>, config: RateProviderConfig) -> Self {
        Self {
            source,
            config,
            cache: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &RateProviderConfig {
        &self.config
    }

    /// 未过期的缓存值
    fn cached(&self) -> Option<CachedRate> {
        let guard = self.cache.lock().ok()?;
        (*guard).filter(|c| c.stored_at.elapsed() < self.config.ttl)
    }

    fn store(&self, rate: f64, fetched_at: DateTime<Utc>) {
        match self.cache.lock() {
            Ok(mut guard) => {
                *guard = Some(CachedRate {
                    rate,
                    stored_at: Instant::now(),
                    fetched_at,
                });
            }
            Err(e) => warn!(error = %e, "汇率缓存锁获取失败, 跳过写入"),
        }
    }

    /// 清空缓存
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.cache.lock() {
            *guard = None;
        }
    }

    /// 获取当前汇率
    pub async fn current_rate(&self) -> RateQuote {
        if let Some(cached) = self.cached() {
            debug!(rate = cached.rate, "汇率缓存命中");
            return RateQuote {
                rate: cached.rate,
                origin: RateOrigin::Cached,
                fetched_at: cached.fetched_at,
            };
        }

        let fetch = self.source.get_rate(&self.config.from, &self.config.to);
        let result = match tokio::time::timeout(self.config.timeout, fetch).await {
            Ok(Ok(rate)) => validate_rate(rate),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(RateError::Timeout(self.config.timeout.as_millis() as u64)),
        };

        match result {
            Ok(rate) => {
                let quote = RateQuote::live(rate);
                self.store(rate, quote.fetched_at);
                info!(
                    from = %self.config.from,
                    to = %self.config.to,
                    rate,
                    "实时汇率获取成功"
                );
                quote
            }
            Err(e) => {
                warn!(
                    from = %self.config.from,
                    to = %self.config.to,
                    error = %e,
                    fallback_rate = self.config.fallback_rate,
                    "汇率获取失败, 使用兜底汇率"
                );
                RateQuote::fallback(self.config.fallback_rate, e.to_string())
            }
        }
    }
}
