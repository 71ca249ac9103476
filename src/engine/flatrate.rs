// ==========================================
// 设备成本报价系统 - 包月资格判定
// ==========================================
// 职责: 根据使用量与融资位置判定是否允许包月耗材计费
// 输出: 资格 + 决策原因 (是否生效由编排器按用户开关钳制)
// 红线: 不按耗材计费的设备永远不允许包月
// ==========================================

use crate::domain::equipment::FinancingBand;
use crate::domain::types::PaymentMode;

// ==========================================
// FlatrateEligibility - 判定结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct FlatrateEligibility {
    pub eligible: bool,
    pub threshold: Option<f64>, // 融资模式下的融资成本门槛
    pub reasons: Vec<String>,
}

/// 判定输入
#[derive(Debug, Clone, Copy)]
pub struct FlatrateRequest<'a> {
    pub uses_credits: bool,
    pub uses_per_day: f64,
    pub financing_cost: f64,
    pub band: &'a FinancingBand,
    pub payment_mode: PaymentMode,
    pub allow_below_threshold: bool,
}

// ==========================================
// FlatrateEligibilityEvaluator
// ==========================================
pub struct FlatrateEligibilityEvaluator {
    min_uses_per_day: f64,
    threshold_ratio: f64,
}

impl FlatrateEligibilityEvaluator {
    pub fn new(min_uses_per_day: f64, threshold_ratio: f64) -> Self {
        Self {
            min_uses_per_day,
            threshold_ratio,
        }
    }

    /// 融资成本门槛
    ///
    /// threshold = min + ratio × (standardOrMax - min)
    /// standard 与 min 重合时改用 max 作为上沿
    pub fn financing_threshold(&self, band: &FinancingBand) -> f64 {
        let upper = if band.standard > band.min {
            band.standard
        } else {
            band.max
        };
        band.min + self.threshold_ratio * (upper - band.min)
    }

    /// 判定包月资格
    ///
    /// # 规则（顺序执行，命中即返回）
    /// 1. 不按耗材计费 → 不允许
    /// 2. 日使用次数 < 下限 → 不允许
    /// 3. 现金购买 → 允许
    /// 4. 融资: 设置了低于门槛放行 → 允许
    /// 5. 融资: 当前融资成本 >= 门槛 → 允许, 否则不允许
    pub fn evaluate(&self, request: &FlatrateRequest<'_>) -> FlatrateEligibility {
        let mut reasons = Vec::new();

        if !request.uses_credits {
            reasons.push("FLATRATE_BLOCKED: equipment does not bill use-credits".to_string());
            return FlatrateEligibility {
                eligible: false,
                threshold: None,
                reasons,
            };
        }

        if !(request.uses_per_day >= self.min_uses_per_day) {
            reasons.push(format!(
                "FLATRATE_BLOCKED: uses_per_day={} < {}",
                request.uses_per_day, self.min_uses_per_day
            ));
            return FlatrateEligibility {
                eligible: false,
                threshold: None,
                reasons,
            };
        }

        match request.payment_mode {
            PaymentMode::Cash => {
                reasons.push(format!(
                    "FLATRATE_ELIGIBLE: cash payment, uses_per_day={}",
                    request.uses_per_day
                ));
                FlatrateEligibility {
                    eligible: true,
                    threshold: None,
                    reasons,
                }
            }
            PaymentMode::Financed => {
                let threshold = self.financing_threshold(request.band);

                if request.allow_below_threshold {
                    reasons.push("FLATRATE_ELIGIBLE: below-threshold override set".to_string());
                    return FlatrateEligibility {
                        eligible: true,
                        threshold: Some(threshold),
                        reasons,
                    };
                }

                let eligible = request.financing_cost >= threshold;
                if eligible {
                    reasons.push(format!(
                        "FLATRATE_ELIGIBLE: financing_cost={} >= threshold={:.2}",
                        request.financing_cost, threshold
                    ));
                } else {
                    reasons.push(format!(
                        "FLATRATE_BLOCKED: financing_cost={} < threshold={:.2}",
                        request.financing_cost, threshold
                    ));
                }
                FlatrateEligibility {
                    eligible,
                    threshold: Some(threshold),
                    reasons,
                }
            }
        }
    }
}
