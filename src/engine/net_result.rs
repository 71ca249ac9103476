// ==========================================
// 设备成本报价系统 - 净利润计算
// ==========================================
// 职责: 月/年净利润 = 不含税月收入 - (摊销成本 + 运营成本)
// 红线: 公式中不允许出现任何隐藏项, 结果可以为负
// ==========================================

use crate::domain::quote::NetResult;
use crate::domain::types::PaymentMode;

pub struct NetResultCalculator {
    cash_amortization_months: u32,
}

impl NetResultCalculator {
    pub fn new(cash_amortization_months: u32) -> Self {
        Self {
            cash_amortization_months,
        }
    }

    /// 每月摊销成本
    ///
    /// - 融资: 当前月融资成本
    /// - 现金: 本币设备价 / 摊销月数
    pub fn amortized_cost(&self, payment_mode: PaymentMode, financing_active: f64, price_local: f64) -> f64 {
        match payment_mode {
            PaymentMode::Financed => financing_active,
            PaymentMode::Cash => {
                if self.cash_amortization_months == 0 {
                    price_local.max(0.0)
                } else {
                    price_local.max(0.0) / self.cash_amortization_months as f64
                }
            }
        }
    }

    pub fn calculate(&self, monthly_revenue_ex_vat: f64, amortized_cost: f64, operating_total: f64) -> NetResult {
        let per_month = monthly_revenue_ex_vat - (amortized_cost + operating_total);
        NetResult {
            per_month,
            per_year: per_month * 12.0,
        }
    }
}
