// ==========================================
// 设备成本报价系统 - 定价配置读取 Trait
// ==========================================
// 职责: 定义定价引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::settings::BandMultipliers;
use crate::domain::tariff::TariffEntry;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// PricingConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait PricingConfigReader: Send + Sync {
    // ===== 税费与营业日 =====

    /// 增值税率
    ///
    /// # 默认值
    /// - 0.25
    async fn get_vat_rate(&self) -> Result<f64, Box<dyn Error>>;

    /// 每月营业天数
    ///
    /// # 默认值
    /// - 22
    async fn get_working_days_per_month(&self) -> Result<f64, Box<dyn Error>>;

    /// 每周营业天数
    ///
    /// # 默认值
    /// - 5
    async fn get_days_per_week(&self) -> Result<f64, Box<dyn Error>>;

    // ===== 包月资格 =====

    /// 包月所需的最少日使用次数
    ///
    /// # 默认值
    /// - 3
    async fn get_flatrate_min_uses_per_day(&self) -> Result<f64, Box<dyn Error>>;

    /// 融资模式下包月门槛比例（相对融资区间下半段宽度）
    ///
    /// # 默认值
    /// - 0.8
    async fn get_flatrate_financing_threshold(&self) -> Result<f64, Box<dyn Error>>;

    // ===== 融资与摊销 =====

    /// 现金购买摊销月数
    ///
    /// # 默认值
    /// - 60
    async fn get_cash_amortization_months(&self) -> Result<u32, Box<dyn Error>>;

    /// 费率表基准期限（显式融资区间按该期限标定）
    ///
    /// # 默认值
    /// - 60
    async fn get_reference_contract_months(&self) -> Result<u32, Box<dyn Error>>;

    /// 融资费率表
    ///
    /// # 默认值
    /// - 24→4.45, 36→3.20, 48→2.60, 60→2.25, 72→2.00
    async fn get_tariff_entries(&self) -> Result<Vec<TariffEntry>, Box<dyn Error>>;

    /// 无显式区间时推导 min/standard/max 的倍数
    ///
    /// # 默认值
    /// - 0.90 / 1.00 / 1.30
    async fn get_band_multipliers(&self) -> Result<BandMultipliers, Box<dyn Error>>;

    // ===== 汇率 =====

    /// 兜底汇率（本币/外币）
    ///
    /// # 默认值
    /// - 11.4926
    async fn get_fallback_exchange_rate(&self) -> Result<f64, Box<dyn Error>>;

    /// 汇率缓存秒数
    ///
    /// # 默认值
    /// - 300
    async fn get_exchange_rate_cache_ttl_secs(&self) -> Result<u64, Box<dyn Error>>;

    /// 汇率获取超时（毫秒）
    ///
    /// # 默认值
    /// - 3000
    async fn get_exchange_rate_timeout_ms(&self) -> Result<u64, Box<dyn Error>>;

    /// 货币对 (外币, 本币)
    ///
    /// # 默认值
    /// - ("EUR", "NOK")
    async fn get_currency_pair(&self) -> Result<(String, String), Box<dyn Error>>;

    // ===== 输入合理范围 =====

    /// 日使用次数上限
    ///
    /// # 默认值
    /// - 50
    async fn get_max_uses_per_day(&self) -> Result<f64, Box<dyn Error>>;

    /// 单次零售价上限（含税）
    ///
    /// # 默认值
    /// - 100000
    async fn get_max_price_per_use(&self) -> Result<f64, Box<dyn Error>>;
}
