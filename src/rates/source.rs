// ==========================================
// 设备成本报价系统 - 汇率源
// ==========================================
// 职责: 定义汇率源接口, 提供 HTTP 实现与静态实现
// 红线: 汇率源只负责取数, 不做缓存与兜底
// ==========================================

use crate::rates::error::{RateError, RateResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// 默认汇率服务地址 (frankfurter 兼容接口)
pub const DEFAULT_RATE_API_URL: &str = "https://api.frankfurter.app";

// ==========================================
// ExchangeRateSource Trait
// ==========================================
#[async_trait]
pub trait ExchangeRateSource: Send + Sync {
    /// 获取 1 单位 from 币种折合的 to 币种数量
    async fn get_rate(&self, from: &str, to: &str) -> RateResult<f64>;
}

/// 汇率必须为正有限数
pub fn validate_rate(rate: f64) -> RateResult<f64> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(RateError::InvalidRate(rate))
    }
}

// ==========================================
// HttpExchangeRateSource
// ==========================================
// GET {base_url}/latest?from=EUR&to=NOK
// 响应: {"base":"EUR","rates":{"NOK":11.49}}
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: HashMap<String, f64>,
}

pub struct HttpExchangeRateSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpExchangeRateSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> RateResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ExchangeRateSource for HttpExchangeRateSource {
    async fn get_rate(&self, from: &str, to: &str) -> RateResult<f64> {
        let url = format!("{}/latest", self.base_url);
        debug!(url = %url, from, to, "请求实时汇率");

        let response = self
            .client
            .get(&url)
            .query(&[("from", from), ("to", to)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RateError::Status(response.status().as_u16()));
        }

        let body: LatestRatesResponse = response.json().await?;
        let rate = body
            .rates
            .get(to)
            .copied()
            .ok_or_else(|| RateError::MissingCurrency(to.to_string()))?;

        validate_rate(rate)
    }
}

// ==========================================
// StaticRateSource - 固定汇率 (离线/测试)
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct StaticRateSource {
    rate: f64,
}

impl StaticRateSource {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }
}

#[async_trait]
impl ExchangeRateSource for StaticRateSource {
    async fn get_rate(&self, _from: &str, _to: &str) -> RateResult<f64> {
        validate_rate(self.rate)
    }
}
