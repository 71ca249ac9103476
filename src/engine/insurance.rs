// ==========================================
// 设备成本报价系统 - 保险费计算
// ==========================================
// 职责: 按设备本币价格分档计算月保险费
// 输入: 本币设备价格 + 保险开关
// 输出: 月保费 (未取整)
// ==========================================

/// 保险费率分档: (价格上限(含), 年费率)
const INSURANCE_TIERS: [(f64, f64); 3] = [(10_000.0, 0.04), (20_000.0, 0.03), (50_000.0, 0.025)];

/// 超出最高档位的年费率
const INSURANCE_TOP_RATE: f64 = 0.015;

// ==========================================
// InsuranceCostCalculator
// ==========================================
pub struct InsuranceCostCalculator;

impl InsuranceCostCalculator {
    /// 年费率
    ///
    /// # 规则
    /// - <= 10,000 → 4%
    /// - <= 20,000 → 3%
    /// - <= 50,000 → 2.5%
    /// - 其他 → 1.5%
    pub fn annual_rate(price_local: f64) -> f64 {
        INSURANCE_TIERS
            .iter()
            .find(|(limit, _)| price_local <= *limit)
            .map(|(_, rate)| *rate)
            .unwrap_or(INSURANCE_TOP_RATE)
    }

    /// 月保费 = 价格 × 年费率 / 12; 未投保或价格 <= 0 时为 0
    pub fn monthly_premium(price_local: f64, insurance: bool) -> f64 {
        if !insurance || !price_local.is_finite() || price_local <= 0.0 {
            return 0.0;
        }
        price_local * Self::annual_rate(price_local) / 12.0
    }
}
