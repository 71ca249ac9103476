// ==========================================
// 设备成本报价系统 - 定价参数快照
// ==========================================
// 职责: 汇总所有定价参数为一个不可变值对象, 供编排器使用
// 说明: 一次推导只读取这一份快照, 推导过程不再访问配置存储
// ==========================================

use crate::config::pricing_config_trait::PricingConfigReader;
use crate::domain::tariff::TariffEntry;
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    pub const VAT_RATE: f64 = 0.25;
    pub const WORKING_DAYS_PER_MONTH: f64 = 22.0;
    pub const DAYS_PER_WEEK: f64 = 5.0;
    pub const FLATRATE_MIN_USES_PER_DAY: f64 = 3.0;
    pub const FLATRATE_FINANCING_THRESHOLD: f64 = 0.8;
    pub const CASH_AMORTIZATION_MONTHS: u32 = 60;
    pub const REFERENCE_CONTRACT_MONTHS: u32 = 60;
    pub const FALLBACK_EXCHANGE_RATE: f64 = 11.4926;
    pub const EXCHANGE_RATE_CACHE_TTL_SECS: u64 = 300;
    pub const EXCHANGE_RATE_TIMEOUT_MS: u64 = 3_000;
    pub const CURRENCY_FROM: &str = "EUR";
    pub const CURRENCY_TO: &str = "NOK";
    pub const MAX_USES_PER_DAY: f64 = 50.0;
    pub const MAX_PRICE_PER_USE: f64 = 100_000.0;

    /// (合同月数, 月费率%)
    pub const TARIFFS: [(u32, f64); 5] = [(24, 4.45), (36, 3.20), (48, 2.60), (60, 2.25), (72, 2.00)];

    pub const BAND_MULTIPLIER_MIN: f64 = 0.90;
    pub const BAND_MULTIPLIER_STANDARD: f64 = 1.00;
    pub const BAND_MULTIPLIER_MAX: f64 = 1.30;
}

// ==========================================
// BandMultipliers - 推导融资区间的倍数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandMultipliers {
    pub min: f64,
    pub standard: f64,
    pub max: f64,
}

impl Default for BandMultipliers {
    fn default() -> Self {
        Self {
            min: defaults::BAND_MULTIPLIER_MIN,
            standard: defaults::BAND_MULTIPLIER_STANDARD,
            max: defaults::BAND_MULTIPLIER_MAX,
        }
    }
}

// ==========================================
// TariffTable - 融资费率表
// ==========================================
// 不变量: 非空、期限唯一且升序、费率为正、包含基准期限
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffTable {
    entries: Vec<TariffEntry>,
    reference_months: u32,
}

impl TariffTable {
    pub fn new(mut entries: Vec<TariffEntry>, reference_months: u32) -> EngineResult<Self> {
        if entries.is_empty() {
            return Err(EngineError::EmptyTariffTable);
        }

        entries.sort_by_key(|e| e.contract_months);

        for (index, entry) in entries.iter().enumerate() {
            let duplicated = index > 0 && entries[index - 1].contract_months == entry.contract_months;
            if duplicated || !entry.rate.is_finite() || entry.rate <= 0.0 || entry.contract_months == 0 {
                return Err(EngineError::InvalidTariff {
                    contract_months: entry.contract_months,
                    rate: entry.rate,
                });
            }
        }

        if !entries.iter().any(|e| e.contract_months == reference_months) {
            return Err(EngineError::MissingReferenceTariff(reference_months));
        }

        Ok(Self {
            entries,
            reference_months,
        })
    }

    pub fn default_entries() -> Vec<TariffEntry> {
        defaults::TARIFFS
            .iter()
            .map(|(months, rate)| TariffEntry::new(*months, *rate))
            .collect()
    }

    pub fn entries(&self) -> &[TariffEntry] {
        &self.entries
    }

    pub fn reference_months(&self) -> u32 {
        self.reference_months
    }

    /// 指定期限的费率
    pub fn rate_for(&self, contract_months: u32) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.contract_months == contract_months)
            .map(|e| e.rate)
    }

    /// 基准期限费率（构造时已保证存在）
    pub fn reference_rate(&self) -> f64 {
        self.rate_for(self.reference_months).unwrap_or(1.0)
    }

    pub fn contains(&self, contract_months: u32) -> bool {
        self.rate_for(contract_months).is_some()
    }
}

impl Default for TariffTable {
    fn default() -> Self {
        Self {
            entries: Self::default_entries(),
            reference_months: defaults::REFERENCE_CONTRACT_MONTHS,
        }
    }
}

// ==========================================
// PricingSettings - 定价参数快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    pub vat_rate: f64,
    pub working_days_per_month: f64,
    pub days_per_week: f64,
    pub flatrate_min_uses_per_day: f64,
    pub flatrate_financing_threshold: f64,
    pub cash_amortization_months: u32,
    pub tariffs: TariffTable,
    pub band_multipliers: BandMultipliers,
    pub fallback_exchange_rate: f64,
    pub exchange_rate_cache_ttl_secs: u64,
    pub exchange_rate_timeout_ms: u64,
    pub currency_from: String,
    pub currency_to: String,
    pub max_uses_per_day: f64,
    pub max_price_per_use: f64,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            vat_rate: defaults::VAT_RATE,
            working_days_per_month: defaults::WORKING_DAYS_PER_MONTH,
            days_per_week: defaults::DAYS_PER_WEEK,
            flatrate_min_uses_per_day: defaults::FLATRATE_MIN_USES_PER_DAY,
            flatrate_financing_threshold: defaults::FLATRATE_FINANCING_THRESHOLD,
            cash_amortization_months: defaults::CASH_AMORTIZATION_MONTHS,
            tariffs: TariffTable::default(),
            band_multipliers: BandMultipliers::default(),
            fallback_exchange_rate: defaults::FALLBACK_EXCHANGE_RATE,
            exchange_rate_cache_ttl_secs: defaults::EXCHANGE_RATE_CACHE_TTL_SECS,
            exchange_rate_timeout_ms: defaults::EXCHANGE_RATE_TIMEOUT_MS,
            currency_from: defaults::CURRENCY_FROM.to_string(),
            currency_to: defaults::CURRENCY_TO.to_string(),
            max_uses_per_day: defaults::MAX_USES_PER_DAY,
            max_price_per_use: defaults::MAX_PRICE_PER_USE,
        }
    }
}

impl PricingSettings {
    /// 从配置读取器加载全部参数
    ///
    /// # 返回
    /// - Err: 读取失败, 或费率表违反不变量（配置错误, 不做恢复）
    pub async fn load<C>(reader: &C) -> Result<Self, Box<dyn Error>>
    where
        C: PricingConfigReader + ?Sized,
    {
        let reference_months = reader.get_reference_contract_months().await?;
        let tariff_entries = reader.get_tariff_entries().await?;
        let tariffs = TariffTable::new(tariff_entries, reference_months)?;
        let (currency_from, currency_to) = reader.get_currency_pair().await?;

        let vat_rate = reader.get_vat_rate().await?;
        let working_days_per_month = reader.get_working_days_per_month().await?;
        let days_per_week = reader.get_days_per_week().await?;
        let flatrate_min_uses_per_day = reader.get_flatrate_min_uses_per_day().await?;
        let flatrate_financing_threshold = reader.get_flatrate_financing_threshold().await?;
        let cash_amortization_months = reader.get_cash_amortization_months().await?;
        let band_multipliers = reader.get_band_multipliers().await?;
        let fallback_exchange_rate = reader.get_fallback_exchange_rate().await?;
        let exchange_rate_cache_ttl_secs = reader.get_exchange_rate_cache_ttl_secs().await?;
        let exchange_rate_timeout_ms = reader.get_exchange_rate_timeout_ms().await?;
        let max_uses_per_day = reader.get_max_uses_per_day().await?;
        let max_price_per_use = reader.get_max_price_per_use().await?;

        Ok(Self {
            vat_rate,
            working_days_per_month,
            days_per_week,
            flatrate_min_uses_per_day,
            flatrate_financing_threshold,
            cash_amortization_months,
            tariffs,
            band_multipliers,
            fallback_exchange_rate,
            exchange_rate_cache_ttl_secs,
            exchange_rate_timeout_ms,
            currency_from,
            currency_to,
            max_uses_per_day,
            max_price_per_use,
        })
    }

    pub fn exchange_rate_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.exchange_rate_cache_ttl_secs)
    }

    pub fn exchange_rate_timeout(&self) -> Duration {
        Duration::from_millis(self.exchange_rate_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tariff_table() {
        let table = TariffTable::default();
        assert_eq!(table.reference_months(), 60);
        assert_eq!(table.reference_rate(), 2.25);
        assert_eq!(table.rate_for(36), Some(3.20));
        assert!(table.rate_for(30).is_none());
    }

    #[test]
    fn test_tariff_table_sorted_and_validated() {
        let table = TariffTable::new(
            vec![TariffEntry::new(60, 2.0), TariffEntry::new(36, 3.0)],
            60,
        )
        .unwrap();
        assert_eq!(table.entries()[0].contract_months, 36);

        assert_eq!(
            TariffTable::new(vec![TariffEntry::new(36, 3.0)], 60).unwrap_err(),
            EngineError::MissingReferenceTariff(60)
        );
        assert_eq!(TariffTable::new(vec![], 60).unwrap_err(), EngineError::EmptyTariffTable);
        assert!(matches!(
            TariffTable::new(vec![TariffEntry::new(60, 2.0), TariffEntry::new(60, 2.1)], 60),
            Err(EngineError::InvalidTariff { contract_months: 60, .. })
        ));
        assert!(matches!(
            TariffTable::new(vec![TariffEntry::new(60, -1.0)], 60),
            Err(EngineError::InvalidTariff { .. })
        ));
    }
}
