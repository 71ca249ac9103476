// ==========================================
// 设备成本报价系统 - 投资位置解析器
// ==========================================
// 职责: 维护投资位置(唯一事实来源), 保证融资成本与单次价格始终一致
// 输入: 位置 / 融资成本编辑 / 单次价格编辑
// 输出: 取整后的 FinancingQuote + CreditQuote
// 红线: 任一编辑都先落到位置, 再由位置正向推导两个报价
//       不允许从单次价格独立反推融资成本(两条取整路径会产生不一致的组合)
// ==========================================

use crate::domain::equipment::{CreditBand, EquipmentProfile, FinancingBand};
use crate::domain::quote::{CreditQuote, FinancingQuote};
use crate::domain::types::{PricingPosition, PricingStep};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::interpolator::{Breakpoint, PricingInterpolator};
use crate::engine::rounding::RoundingPolicy;
use tracing::debug;

// ==========================================
// PricingPositionResolver
// ==========================================
#[derive(Debug, Clone)]
pub struct PricingPositionResolver {
    equipment_id: String,
    uses_credits: bool,
    interpolator: PricingInterpolator,
    band: FinancingBand,
    collapsed: bool, // 融资区间退化为单点: 位置固定在标准档
    position: PricingPosition,
    financing: FinancingQuote,
    credit: CreditQuote,
}

impl PricingPositionResolver {
    /// 由融资区间与单次价格区间构建三个命名断点
    ///
    /// # 断点
    /// - MIN (0.0): 融资最低 / 单次价格最高
    /// - STANDARD (0.5): 融资标准 / 单次价格中点
    /// - MAX (1.0): 融资最高 / 单次价格最低
    ///
    /// 单次价格两端向区间内取整, 报价不会越出目录区间;
    /// 区间内没有以 9 结尾的价格时三个断点都取中点的取整值。
    /// 不按耗材计费的设备单次价格恒为 0
    pub fn build_breakpoints(band: &FinancingBand, credit: Option<&CreditBand>) -> Vec<Breakpoint> {
        let (price_min, price_standard, price_max) = match credit {
            Some(c) => {
                let lo = RoundingPolicy::credit_at_least(c.min);
                let hi = RoundingPolicy::credit_at_most(c.max);
                let mid = RoundingPolicy::credit(c.midpoint());
                if lo <= hi {
                    (lo, mid.clamp(lo, hi), hi)
                } else {
                    (mid, mid, mid)
                }
            }
            None => (0.0, 0.0, 0.0),
        };

        vec![
            Breakpoint::new(
                PricingStep::Min.to_string(),
                PricingStep::Min.position(),
                band.min,
                price_max,
            ),
            Breakpoint::new(
                PricingStep::Standard.to_string(),
                PricingStep::Standard.position(),
                band.standard,
                price_standard,
            ),
            Breakpoint::new(
                PricingStep::Max.to_string(),
                PricingStep::Max.position(),
                band.max,
                price_min,
            ),
        ]
    }

    /// 创建解析器并立即按初始位置推导报价
    ///
    /// # 参数
    /// - profile: 设备档案
    /// - band: 已取整的融资区间 (FinancingRangeCalculator 输出)
    /// - initial: 初始位置 (新设备/新期限时为标准档)
    pub fn new(
        profile: &EquipmentProfile,
        band: FinancingBand,
        initial: PricingPosition,
    ) -> EngineResult<Self> {
        let credit = if profile.uses_credits {
            profile.credit.as_ref()
        } else {
            None
        };
        let interpolator = PricingInterpolator::new(Self::build_breakpoints(&band, credit))?;

        let mut resolver = Self {
            equipment_id: profile.id.clone(),
            uses_credits: credit.is_some(),
            interpolator,
            band,
            collapsed: band.max <= band.min,
            position: initial,
            financing: FinancingQuote::default(),
            credit: CreditQuote::default(),
        };
        resolver.set_position(initial.value());
        Ok(resolver)
    }

    pub fn position(&self) -> PricingPosition {
        self.position
    }

    pub fn financing_quote(&self) -> FinancingQuote {
        self.financing
    }

    pub fn credit_quote(&self) -> CreditQuote {
        self.credit
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn interpolator(&self) -> &PricingInterpolator {
        &self.interpolator
    }

    /// 设置位置
    ///
    /// 位置夹取到定义域, 正向插值后两个值分别取整
    pub fn set_position(&mut self, position: f64) -> PricingPosition {
        self.apply(position);
        self.position
    }

    /// 选择命名档位
    pub fn set_step(&mut self, step: PricingStep) -> PricingPosition {
        self.set_position(step.position())
    }

    /// 编辑月融资成本
    ///
    /// # 规则
    /// 1. 金额夹取到 [min, max]
    /// 2. 取整后与当前报价相同 → 位置不动
    /// 3. 否则在融资轴上反向插值得到位置, 再由位置推导单次价格
    pub fn set_financing_cost(&mut self, amount: f64) -> PricingPosition {
        if self.collapsed {
            return self.set_step(PricingStep::Standard);
        }
        if amount.is_nan() {
            return self.position;
        }

        let (lo, hi) = self.interpolator.financing_range();
        let clamped = amount.clamp(lo, hi);

        if RoundingPolicy::financing(clamped) == self.financing.active {
            debug!(amount, "融资成本编辑未改变取整结果, 位置保持不变");
            return self.position;
        }

        let position = self.interpolator.position_for_financing(clamped);
        self.set_position(position)
    }

    /// 编辑单次耗材价格
    ///
    /// # 规则
    /// 与融资成本编辑对称, 仅按耗材计费的设备可用;
    /// 金额夹取到断点的价格区间 (目录区间内的合规价格)
    ///
    /// # 返回
    /// - Err(UsePriceNotBilled): 设备不按耗材计费, 状态不变
    pub fn set_use_price(&mut self, amount: f64) -> EngineResult<PricingPosition> {
        if !self.uses_credits {
            return Err(EngineError::UsePriceNotBilled(self.equipment_id.clone()));
        }
        if self.collapsed {
            return Ok(self.set_step(PricingStep::Standard));
        }
        if amount.is_nan() {
            return Ok(self.position);
        }

        let (lo, hi) = self.interpolator.use_price_range();
        let clamped = amount.clamp(lo, hi);

        if RoundingPolicy::credit(clamped) == self.credit.active {
            debug!(amount, "单次价格编辑未改变取整结果, 位置保持不变");
            return Ok(self.position);
        }

        let position = self.interpolator.position_for_use_price(clamped);
        Ok(self.set_position(position))
    }

    fn apply(&mut self, position: f64) {
        let p = if self.collapsed {
            PricingStep::Standard.position()
        } else {
            self.interpolator.clamp_position(position)
        };

        let point = self.interpolator.interpolate(p);
        let (price_lo, price_hi) = self.interpolator.use_price_range();

        self.position = PricingPosition::new(p);
        self.financing = FinancingQuote {
            min: self.band.min,
            standard: self.band.standard,
            max: self.band.max,
            active: RoundingPolicy::financing(point.financing_cost),
        };
        self.credit = if self.uses_credits {
            CreditQuote {
                min: price_lo,
                max: price_hi,
                active: RoundingPolicy::credit(point.use_price),
            }
        } else {
            CreditQuote::default()
        };
    }
}
