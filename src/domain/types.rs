// ==========================================
// 设备成本报价系统 - 领域类型定义
// ==========================================
// 红线: 付款方式/服务档位为封闭枚举,禁止字符串分派
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 付款方式 (Payment Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    Financed, // 融资租赁(按月融资成本)
    Cash,     // 现金购买(按固定期限摊销)
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMode::Financed => write!(f, "FINANCED"),
            PaymentMode::Cash => write!(f, "CASH"),
        }
    }
}

impl std::str::FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "financed" | "financing" | "leasing" => Ok(PaymentMode::Financed),
            "cash" => Ok(PaymentMode::Cash),
            other => Err(format!("未知付款方式: {}", other)),
        }
    }
}

impl Default for PaymentMode {
    fn default() -> Self {
        PaymentMode::Financed
    }
}

// ==========================================
// 服务档位 (Service Tier)
// ==========================================
// 顺序: Basic < Extended < Premium
// 高两档固定捆绑包月耗材(按档位折扣),最低档从不捆绑
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceTier {
    Basic,    // 档位1: 无服务费,耗材按开关计费
    Extended, // 档位2: 服务费 = 25% 参考融资额, 包月额减半
    Premium,  // 档位3: 服务费 = 50% 参考融资额, 包月额为零
}

impl ServiceTier {
    pub const ALL: [ServiceTier; 3] = [ServiceTier::Basic, ServiceTier::Extended, ServiceTier::Premium];

    /// 是否捆绑包月耗材
    pub fn bundles_flatrate(&self) -> bool {
        !matches!(self, ServiceTier::Basic)
    }

    /// 捆绑包月耗材时的计费系数（Basic 不捆绑,返回 1.0）
    pub fn flatrate_factor(&self) -> f64 {
        match self {
            ServiceTier::Basic => 1.0,
            ServiceTier::Extended => 0.5,
            ServiceTier::Premium => 0.0,
        }
    }

    /// 服务费占参考融资额的比例
    pub fn service_fee_ratio(&self) -> f64 {
        match self {
            ServiceTier::Basic => 0.0,
            ServiceTier::Extended => 0.25,
            ServiceTier::Premium => 0.5,
        }
    }
}

impl fmt::Display for ServiceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceTier::Basic => write!(f, "BASIC"),
            ServiceTier::Extended => write!(f, "EXTENDED"),
            ServiceTier::Premium => write!(f, "PREMIUM"),
        }
    }
}

impl std::str::FromStr for ServiceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" | "tier1" | "1" => Ok(ServiceTier::Basic),
            "extended" | "tier2" | "2" => Ok(ServiceTier::Extended),
            "premium" | "tier3" | "3" => Ok(ServiceTier::Premium),
            other => Err(format!("未知服务档位: {}", other)),
        }
    }
}

impl Default for ServiceTier {
    fn default() -> Self {
        ServiceTier::Basic
    }
}

// ==========================================
// 投资档位 (Pricing Step)
// ==========================================
// 五个有序档位, 对应连续位置 0 / 0.25 / 0.5 / 0.75 / 1
// Min: 融资最低、耗材最贵; Max: 融资最高、耗材最便宜
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingStep {
    Min,
    Low,
    Standard,
    High,
    Max,
}

impl PricingStep {
    pub const ALL: [PricingStep; 5] = [
        PricingStep::Min,
        PricingStep::Low,
        PricingStep::Standard,
        PricingStep::High,
        PricingStep::Max,
    ];

    /// 档位对应的连续位置
    pub fn position(&self) -> f64 {
        match self {
            PricingStep::Min => 0.0,
            PricingStep::Low => 0.25,
            PricingStep::Standard => 0.5,
            PricingStep::High => 0.75,
            PricingStep::Max => 1.0,
        }
    }
}

impl fmt::Display for PricingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingStep::Min => write!(f, "MIN"),
            PricingStep::Low => write!(f, "LOW"),
            PricingStep::Standard => write!(f, "STANDARD"),
            PricingStep::High => write!(f, "HIGH"),
            PricingStep::Max => write!(f, "MAX"),
        }
    }
}

// ==========================================
// 投资位置 (Pricing Position)
// ==========================================
// 唯一事实来源: 融资成本与单次价格都由它推导
// 取值范围 [0, 1], 构造时即夹取
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct PricingPosition(f64);

impl PricingPosition {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 1.0;

    /// 创建位置（夹取到 [0, 1]; NaN 视为标准档）
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::from_step(PricingStep::Standard);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn from_step(step: PricingStep) -> Self {
        Self(step.position())
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// 最接近的命名档位
    pub fn nearest_step(&self) -> PricingStep {
        let mut best = PricingStep::Standard;
        let mut best_distance = f64::MAX;
        for step in PricingStep::ALL {
            let distance = (step.position() - self.0).abs();
            if distance < best_distance {
                best = step;
                best_distance = distance;
            }
        }
        best
    }
}

impl Default for PricingPosition {
    fn default() -> Self {
        Self::from_step(PricingStep::Standard)
    }
}

impl fmt::Display for PricingPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}
