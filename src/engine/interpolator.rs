// ==========================================
// 设备成本报价系统 - 分段线性定价插值
// ==========================================
// 职责: 投资位置 → (融资成本, 单次价格), 以及两条轴上的反向插值
// 红线: 融资成本随位置单调不减, 单次价格随位置单调不增
//       违反单调性的断点集在构造时即拒绝
// ==========================================

use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

// ==========================================
// Breakpoint - 命名断点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub label: String,
    pub position: f64,
    pub financing_cost: f64,
    pub use_price: f64,
}

impl Breakpoint {
    pub fn new(label: impl Into<String>, position: f64, financing_cost: f64, use_price: f64) -> Self {
        Self {
            label: label.into(),
            position,
            financing_cost,
            use_price,
        }
    }
}

/// 插值结果 (未取整)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolatedPoint {
    pub financing_cost: f64,
    pub use_price: f64,
}

// ==========================================
// PricingInterpolator
// ==========================================
#[derive(Debug, Clone)]
pub struct PricingInterpolator {
    breakpoints: Vec<Breakpoint>,
}

impl PricingInterpolator {
    pub const MIN_BREAKPOINTS: usize = 3;

    /// 创建插值器并校验断点
    ///
    /// # 校验
    /// 1. 至少 3 个断点
    /// 2. 所有数值有限
    /// 3. position 严格递增
    /// 4. financing_cost 单调不减, use_price 单调不增
    pub fn new(breakpoints: Vec<Breakpoint>) -> EngineResult<Self> {
        if breakpoints.len() < Self::MIN_BREAKPOINTS {
            return Err(EngineError::NotEnoughBreakpoints {
                required: Self::MIN_BREAKPOINTS,
                actual: breakpoints.len(),
            });
        }

        for bp in &breakpoints {
            for (field, value) in [
                ("position", bp.position),
                ("financing_cost", bp.financing_cost),
                ("use_price", bp.use_price),
            ] {
                if !value.is_finite() {
                    return Err(EngineError::NonFiniteValue {
                        field: format!("{}.{}", bp.label, field),
                        value,
                    });
                }
            }
        }

        for (index, pair) in breakpoints.windows(2).enumerate() {
            let (a, b) = (&pair[0], &pair[1]);
            if b.position <= a.position {
                return Err(EngineError::UnorderedBreakpoints {
                    index: index + 1,
                    position: b.position,
                });
            }
            if b.financing_cost < a.financing_cost {
                return Err(EngineError::NonMonotonicBreakpoints {
                    index: index + 1,
                    message: format!(
                        "financing_cost 下降: {} ({}) → {} ({})",
                        a.financing_cost, a.label, b.financing_cost, b.label
                    ),
                });
            }
            if b.use_price > a.use_price {
                return Err(EngineError::NonMonotonicBreakpoints {
                    index: index + 1,
                    message: format!(
                        "use_price 上升: {} ({}) → {} ({})",
                        a.use_price, a.label, b.use_price, b.label
                    ),
                });
            }
        }

        Ok(Self { breakpoints })
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    fn first(&self) -> &Breakpoint {
        &self.breakpoints[0]
    }

    fn last(&self) -> &Breakpoint {
        &self.breakpoints[self.breakpoints.len() - 1]
    }

    /// 位置定义域 [首断点, 末断点]
    pub fn domain(&self) -> (f64, f64) {
        (self.first().position, self.last().position)
    }

    /// 融资成本可达区间
    pub fn financing_range(&self) -> (f64, f64) {
        (self.first().financing_cost, self.last().financing_cost)
    }

    /// 单次价格可达区间 (min, max)
    pub fn use_price_range(&self) -> (f64, f64) {
        (self.last().use_price, self.first().use_price)
    }

    /// 夹取位置到定义域 (NaN 视为定义域起点)
    pub fn clamp_position(&self, position: f64) -> f64 {
        let (lo, hi) = self.domain();
        if position.is_nan() {
            return lo;
        }
        position.clamp(lo, hi)
    }

    /// 正向插值
    ///
    /// # 规则
    /// - 位置先夹取到定义域
    /// - 命中断点时原样返回断点值
    /// - 否则在所在区段内对两个坐标分别线性插值
    pub fn interpolate(&self, position: f64) -> InterpolatedPoint {
        let p = self.clamp_position(position);

        if let Some(bp) = self.breakpoints.iter().find(|bp| bp.position == p) {
            return InterpolatedPoint {
                financing_cost: bp.financing_cost,
                use_price: bp.use_price,
            };
        }

        for pair in self.breakpoints.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if p > a.position && p < b.position {
                let t = (p - a.position) / (b.position - a.position);
                return InterpolatedPoint {
                    financing_cost: lerp(a.financing_cost, b.financing_cost, t),
                    use_price: lerp(a.use_price, b.use_price, t),
                };
            }
        }

        // 夹取后必然命中断点或区段,此处仅为穷尽分支
        let bp = self.last();
        InterpolatedPoint {
            financing_cost: bp.financing_cost,
            use_price: bp.use_price,
        }
    }

    /// 反向插值: 融资成本 → 位置
    ///
    /// 金额先夹取到可达区间; 平坦区段取最靠前的位置
    pub fn position_for_financing(&self, amount: f64) -> f64 {
        let (lo, hi) = self.financing_range();
        let amount = if amount.is_nan() { lo } else { amount.clamp(lo, hi) };

        if let Some(bp) = self.breakpoints.iter().find(|bp| bp.financing_cost == amount) {
            return bp.position;
        }

        for pair in self.breakpoints.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if amount > a.financing_cost && amount < b.financing_cost {
                let t = (amount - a.financing_cost) / (b.financing_cost - a.financing_cost);
                return lerp(a.position, b.position, t);
            }
        }

        self.last().position
    }

    /// 反向插值: 单次价格 → 位置
    ///
    /// 价格轴单调不增, 其余规则与融资轴对称
    pub fn position_for_use_price(&self, amount: f64) -> f64 {
        let (lo, hi) = self.use_price_range();
        let amount = if amount.is_nan() { hi } else { amount.clamp(lo, hi) };

        if let Some(bp) = self.breakpoints.iter().find(|bp| bp.use_price == amount) {
            return bp.position;
        }

        for pair in self.breakpoints.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if amount < a.use_price && amount > b.use_price {
                let t = (a.use_price - amount) / (a.use_price - b.use_price);
                return lerp(a.position, b.position, t);
            }
        }

        self.last().position
    }
}

/// 线性插值, 结果夹在两端点之间以消除浮点越界
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let value = a + (b - a) * t;
    value.clamp(a.min(b), a.max(b))
}
