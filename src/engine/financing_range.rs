// ==========================================
// 设备成本报价系统 - 融资区间计算
// ==========================================
// 职责: 计算给定设备/合同期限/保险组合下可达的 [min, standard, max] 月融资成本
// 输入: 设备档案 + 合同期限 + 本币价格 + 保险开关
// 输出: 取整后的融资区间 (已含保费)
// ==========================================

use crate::config::settings::PricingSettings;
use crate::domain::equipment::{EquipmentProfile, FinancingBand};
use crate::domain::quote::QuoteWarning;
use crate::engine::insurance::InsuranceCostCalculator;
use crate::engine::rounding::RoundingPolicy;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ==========================================
// FinancingRange - 区间计算结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancingRange {
    pub band: FinancingBand,      // 取整后, 已含保费
    pub insurance_premium: f64,   // 月保费 (未取整)
    pub contract_months: u32,
    pub tariff_rate: f64,
    pub explicit_band: bool,      // true: 来自目录显式区间; false: 按费率推导
}

impl FinancingRange {
    /// 区间宽度为零
    pub fn is_degenerate(&self) -> bool {
        self.band.max <= self.band.min
    }
}

// ==========================================
// FinancingRangeCalculator
// ==========================================
pub struct FinancingRangeCalculator<'a> {
    settings: &'a PricingSettings,
}

impl<'a> FinancingRangeCalculator<'a> {
    pub fn new(settings: &'a PricingSettings) -> Self {
        Self { settings }
    }

    /// 解析合同期限
    ///
    /// # 规则
    /// 1. 请求的期限在费率表中 → 直接使用
    /// 2. 否则依次回退到设备默认期限、费率表基准期限
    /// 3. 发生回退且请求/默认值非空时给出 UnknownContractLength 告警
    pub fn resolve_contract_months(
        &self,
        requested: Option<u32>,
        profile: &EquipmentProfile,
    ) -> (u32, Option<QuoteWarning>) {
        let tariffs = &self.settings.tariffs;
        let reference = tariffs.reference_months();

        let fallback = profile
            .default_contract_months
            .filter(|m| tariffs.contains(*m))
            .unwrap_or(reference);

        match requested.or(profile.default_contract_months) {
            Some(months) if tariffs.contains(months) => (months, None),
            Some(months) => (
                fallback,
                Some(QuoteWarning::UnknownContractLength {
                    requested: months,
                    used: fallback,
                }),
            ),
            None => (reference, None),
        }
    }

    /// 计算融资区间
    ///
    /// # 规则
    /// - 设备带显式区间: 区间 × (期限费率 / 基准期限费率)
    /// - 否则: 本币价格 × 期限费率% × (min/standard/max 倍数)
    /// - 投保时每个值加上月保费, 再统一按融资规则取整
    pub fn calculate(
        &self,
        profile: &EquipmentProfile,
        contract_months: u32,
        price_local: f64,
        insurance: bool,
    ) -> FinancingRange {
        let tariffs = &self.settings.tariffs;
        let tariff_rate = tariffs
            .rate_for(contract_months)
            .unwrap_or_else(|| tariffs.reference_rate());

        let raw = match profile.financing {
            Some(band) => band.scaled(tariff_rate / tariffs.reference_rate()),
            None => {
                let base = price_local.max(0.0) * tariff_rate / 100.0;
                let m = self.settings.band_multipliers;
                FinancingBand {
                    min: base * m.min,
                    standard: base * m.standard,
                    max: base * m.max,
                }
            }
        };

        let insurance_premium = InsuranceCostCalculator::monthly_premium(price_local, insurance);

        let band = FinancingBand {
            min: RoundingPolicy::financing(raw.min + insurance_premium),
            standard: RoundingPolicy::financing(raw.standard + insurance_premium),
            max: RoundingPolicy::financing(raw.max + insurance_premium),
        };

        let range = FinancingRange {
            band,
            insurance_premium,
            contract_months,
            tariff_rate,
            explicit_band: profile.financing.is_some(),
        };

        if range.is_degenerate() {
            warn!(
                equipment_id = %profile.id,
                contract_months,
                value = band.min,
                "融资区间宽度为零, 按单点处理"
            );
        } else {
            debug!(
                equipment_id = %profile.id,
                contract_months,
                min = band.min,
                standard = band.standard,
                max = band.max,
                "融资区间计算完成"
            );
        }

        range
    }
}
