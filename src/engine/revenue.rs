// ==========================================
// 设备成本报价系统 - 收入计算
// ==========================================
// 职责: 日/周/月/年收入 (含税与不含税) + 占用率情景
// ==========================================

use crate::domain::quote::{OccupancyScenarios, RevenueAmount, RevenueBreakdown};

pub struct RevenueCalculator {
    vat_rate: f64,
    days_per_week: f64,
    working_days_per_month: f64,
}

impl RevenueCalculator {
    pub const MONTHS_PER_YEAR: f64 = 12.0;

    pub fn new(vat_rate: f64, days_per_week: f64, working_days_per_month: f64) -> Self {
        Self {
            vat_rate,
            days_per_week,
            working_days_per_month,
        }
    }

    /// 含税金额 → 金额对
    pub fn amount(&self, tax_inclusive: f64) -> RevenueAmount {
        RevenueAmount {
            tax_inclusive,
            tax_exclusive: self.exclude_vat(tax_inclusive),
        }
    }

    pub fn exclude_vat(&self, tax_inclusive: f64) -> f64 {
        tax_inclusive / (1.0 + self.vat_rate)
    }

    /// 计算多周期收入
    ///
    /// # 参数
    /// - uses_per_day: 日使用次数 (已夹取)
    /// - price_per_use: 单次零售价, 含税 (已夹取)
    pub fn calculate(&self, uses_per_day: f64, price_per_use: f64) -> RevenueBreakdown {
        let daily = uses_per_day * price_per_use;
        let weekly = daily * self.days_per_week;
        let monthly = daily * self.working_days_per_month;
        let yearly = monthly * Self::MONTHS_PER_YEAR;

        RevenueBreakdown {
            daily: self.amount(daily),
            weekly: self.amount(weekly),
            monthly: self.amount(monthly),
            yearly: self.amount(yearly),
            occupancy: OccupancyScenarios {
                half: yearly * 0.5,
                three_quarters: yearly * 0.75,
                full: yearly,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_revenue() {
        let calc = RevenueCalculator::new(0.25, 5.0, 22.0);
        let revenue = calc.calculate(4.0, 2_500.0);

        assert_eq!(revenue.daily.tax_inclusive, 10_000.0);
        assert_eq!(revenue.daily.tax_exclusive, 8_000.0);
        assert_eq!(revenue.weekly.tax_inclusive, 50_000.0);
        assert_eq!(revenue.monthly.tax_inclusive, 220_000.0);
        assert_eq!(revenue.monthly.tax_exclusive, 176_000.0);
        assert_eq!(revenue.yearly.tax_inclusive, 2_640_000.0);
        assert_eq!(revenue.yearly.tax_exclusive, 2_112_000.0);
    }

    #[test]
    fn test_occupancy_scenarios() {
        let calc = RevenueCalculator::new(0.25, 5.0, 22.0);
        let revenue = calc.calculate(4.0, 2_500.0);
        assert_eq!(revenue.occupancy.half, 1_320_000.0);
        assert_eq!(revenue.occupancy.three_quarters, 1_980_000.0);
        assert_eq!(revenue.occupancy.full, 2_640_000.0);
    }

    #[test]
    fn test_zero_usage() {
        let calc = RevenueCalculator::new(0.25, 5.0, 22.0);
        assert_eq!(calc.calculate(0.0, 2_500.0), RevenueBreakdown::default());
    }
}
