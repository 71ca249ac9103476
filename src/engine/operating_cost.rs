// ==========================================
// 设备成本报价系统 - 月运营成本计算
// ==========================================
// 职责: 计算耗材成本(包月或按次) + 服务档位费用
// 红线: 高档位服务的耗材成本只由档位折扣决定, 与包月开关无关
// ==========================================

use crate::domain::equipment::EquipmentProfile;
use crate::domain::quote::OperatingCostBreakdown;
use crate::domain::types::ServiceTier;

/// 运营成本输入
#[derive(Debug, Clone, Copy)]
pub struct OperatingCostInput<'a> {
    pub profile: &'a EquipmentProfile,
    pub uses_per_day: f64,
    pub use_price: f64,            // 当前单次耗材价格 (已取整)
    pub flatrate_active: bool,     // 已按资格钳制
    pub service_tier: ServiceTier,
    pub reference_financing: f64,  // 服务费基准 (融资区间标准值)
}

// ==========================================
// OperatingCostCalculator
// ==========================================
pub struct OperatingCostCalculator {
    working_days_per_month: f64,
}

impl OperatingCostCalculator {
    pub fn new(working_days_per_month: f64) -> Self {
        Self {
            working_days_per_month,
        }
    }

    /// 按次计费的月耗材成本
    pub fn per_use_consumable(&self, profile: &EquipmentProfile, uses_per_day: f64, use_price: f64) -> f64 {
        if !profile.uses_credits {
            return 0.0;
        }
        uses_per_day * self.working_days_per_month * profile.uses_per_treatment * use_price
    }

    /// 计算月运营成本
    ///
    /// # 规则
    /// - Basic: 包月生效取包月金额, 否则按次计费
    /// - Extended/Premium: 包月金额 × 档位折扣 (0.5 / 0), 视为包月
    /// - 服务费 = 档位比例 × 基准融资值 (0 / 0.25 / 0.5)
    pub fn calculate(&self, input: &OperatingCostInput<'_>) -> OperatingCostBreakdown {
        let profile = input.profile;
        let tier = input.service_tier;

        let (consumable_cost, using_flatrate) = if tier.bundles_flatrate() {
            if profile.uses_credits {
                (profile.flatrate_amount * tier.flatrate_factor(), true)
            } else {
                (0.0, false)
            }
        } else if input.flatrate_active {
            (profile.flatrate_amount, true)
        } else {
            (
                self.per_use_consumable(profile, input.uses_per_day, input.use_price),
                false,
            )
        };

        let service_cost = tier.service_fee_ratio() * input.reference_financing.max(0.0);

        OperatingCostBreakdown {
            consumable_cost,
            service_cost,
            total: consumable_cost + service_cost,
            using_flatrate,
        }
    }
}
