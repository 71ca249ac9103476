// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use equipment_quote::config::{BandMultipliers, PricingConfigReader, PricingSettings};
use equipment_quote::domain::TariffEntry;
use std::error::Error;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub vat_rate: f64,
    pub working_days_per_month: f64,
    pub days_per_week: f64,
    pub flatrate_min_uses_per_day: f64,
    pub flatrate_financing_threshold: f64,
    pub cash_amortization_months: u32,
    pub reference_contract_months: u32,
    pub tariffs: Vec<TariffEntry>,
    pub band_multipliers: BandMultipliers,
    pub fallback_exchange_rate: f64,
    pub exchange_rate_cache_ttl_secs: u64,
    pub exchange_rate_timeout_ms: u64,
    pub max_uses_per_day: f64,
    pub max_price_per_use: f64,
    pub fail_tariffs: bool,
}

impl MockConfig {
    /// 创建默认配置 (与 PricingSettings::default 一致)
    pub fn default() -> Self {
        let settings = PricingSettings::default();
        Self {
            vat_rate: settings.vat_rate,
            working_days_per_month: settings.working_days_per_month,
            days_per_week: settings.days_per_week,
            flatrate_min_uses_per_day: settings.flatrate_min_uses_per_day,
            flatrate_financing_threshold: settings.flatrate_financing_threshold,
            cash_amortization_months: settings.cash_amortization_months,
            reference_contract_months: settings.tariffs.reference_months(),
            tariffs: settings.tariffs.entries().to_vec(),
            band_multipliers: settings.band_multipliers,
            fallback_exchange_rate: settings.fallback_exchange_rate,
            exchange_rate_cache_ttl_secs: settings.exchange_rate_cache_ttl_secs,
            exchange_rate_timeout_ms: settings.exchange_rate_timeout_ms,
            max_uses_per_day: settings.max_uses_per_day,
            max_price_per_use: settings.max_price_per_use,
            fail_tariffs: false,
        }
    }

    /// 自定义增值税率与工作日
    pub fn with_vat(vat_rate: f64, working_days_per_month: f64) -> Self {
        let mut config = Self::default();
        config.vat_rate = vat_rate;
        config.working_days_per_month = working_days_per_month;
        config
    }

    /// 读取费率表时失败
    pub fn broken_tariffs() -> Self {
        let mut config = Self::default();
        config.fail_tariffs = true;
        config
    }
}

#[async_trait]
impl PricingConfigReader for MockConfig {
    async fn get_vat_rate(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.vat_rate)
    }

    async fn get_working_days_per_month(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.working_days_per_month)
    }

    async fn get_days_per_week(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.days_per_week)
    }

    async fn get_flatrate_min_uses_per_day(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.flatrate_min_uses_per_day)
    }

    async fn get_flatrate_financing_threshold(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.flatrate_financing_threshold)
    }

    async fn get_cash_amortization_months(&self) -> Result<u32, Box<dyn Error>> {
        Ok(self.cash_amortization_months)
    }

    async fn get_reference_contract_months(&self) -> Result<u32, Box<dyn Error>> {
        Ok(self.reference_contract_months)
    }

    async fn get_tariff_entries(&self) -> Result<Vec<TariffEntry>, Box<dyn Error>> {
        if self.fail_tariffs {
            return Err("tariff_table 不可读".into());
        }
        Ok(self.tariffs.clone())
    }

    async fn get_band_multipliers(&self) -> Result<BandMultipliers, Box<dyn Error>> {
        Ok(self.band_multipliers)
    }

    async fn get_fallback_exchange_rate(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.fallback_exchange_rate)
    }

    async fn get_exchange_rate_cache_ttl_secs(&self) -> Result<u64, Box<dyn Error>> {
        Ok(self.exchange_rate_cache_ttl_secs)
    }

    async fn get_exchange_rate_timeout_ms(&self) -> Result<u64, Box<dyn Error>> {
        Ok(self.exchange_rate_timeout_ms)
    }

    async fn get_currency_pair(&self) -> Result<(String, String), Box<dyn Error>> {
        Ok(("EUR".to_string(), "NOK".to_string()))
    }

    async fn get_max_uses_per_day(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.max_uses_per_day)
    }

    async fn get_max_price_per_use(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.max_price_per_use)
    }
}
