// ==========================================
// 设备成本报价系统 - 报价输入与结果快照
// ==========================================
// 职责: 定义一次推导的输入向量、编辑事件、告警与结果快照
// 红线: 快照只由编排器生成,一次推导一个快照,不存在中间态
// ==========================================

use crate::domain::rate::RateOrigin;
use crate::domain::types::{PaymentMode, PricingPosition, PricingStep, ServiceTier};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// PricingEdit - 投资位置编辑事件
// ==========================================
// 用户可以直接拖动位置,也可以编辑融资成本或单次价格,
// 三种编辑最终都落到同一个位置上
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingEdit {
    Keep,                 // 沿用上一次的位置
    Step(PricingStep),    // 选择命名档位
    Position(f64),        // 连续位置 [0, 1]
    FinancingCost(f64),   // 编辑月融资成本
    UsePrice(f64),        // 编辑单次耗材价格
}

impl Default for PricingEdit {
    fn default() -> Self {
        PricingEdit::Keep
    }
}

// ==========================================
// QuoteInput - 输入向量
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteInput {
    pub equipment_id: String,
    pub uses_per_day: f64,
    #[serde(default)]
    pub price_per_use: Option<f64>,       // 含税; None 时取设备默认零售价
    #[serde(default)]
    pub payment_mode: PaymentMode,
    #[serde(default)]
    pub contract_months: Option<u32>,     // None 时取设备默认期限
    #[serde(default)]
    pub insurance: bool,
    #[serde(default)]
    pub service_tier: ServiceTier,
    #[serde(default)]
    pub flatrate_requested: bool,         // 用户包月开关 (会被资格钳制)
    #[serde(default)]
    pub allow_flatrate_below_threshold: bool,
    #[serde(default)]
    pub pricing_edit: PricingEdit,
}

impl QuoteInput {
    pub fn new(equipment_id: impl Into<String>) -> Self {
        Self {
            equipment_id: equipment_id.into(),
            uses_per_day: 0.0,
            price_per_use: None,
            payment_mode: PaymentMode::Financed,
            contract_months: None,
            insurance: false,
            service_tier: ServiceTier::Basic,
            flatrate_requested: false,
            allow_flatrate_below_threshold: false,
            pricing_edit: PricingEdit::Keep,
        }
    }
}

// ==========================================
// QuoteWarning - 可恢复告警
// ==========================================
// 除配置错误外,所有异常都以告警形式随有效结果一起返回
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteWarning {
    InputOutOfRange {
        field: String,
        given: f64,
        clamped: f64,
    },
    ExternalSourceFailure {
        reason: String,
        fallback_rate: f64,
    },
    DegenerateRange {
        value: f64,
    },
    UnknownEquipment {
        equipment_id: String,
    },
    UnknownContractLength {
        requested: u32,
        used: u32,
    },
    UsePriceNotBilled {
        requested: f64,
    },
}

impl fmt::Display for QuoteWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteWarning::InputOutOfRange {
                field,
                given,
                clamped,
            } => write!(f, "INPUT_OUT_OF_RANGE: {}={} 已夹取为 {}", field, given, clamped),
            QuoteWarning::ExternalSourceFailure {
                reason,
                fallback_rate,
            } => write!(
                f,
                "EXTERNAL_SOURCE_FAILURE: {} (使用兜底汇率 {})",
                reason, fallback_rate
            ),
            QuoteWarning::DegenerateRange { value } => {
                write!(f, "DEGENERATE_RANGE: 融资区间退化为单点 {}", value)
            }
            QuoteWarning::UnknownEquipment { equipment_id } => {
                write!(f, "UNKNOWN_EQUIPMENT: {}", equipment_id)
            }
            QuoteWarning::UnknownContractLength { requested, used } => write!(
                f,
                "UNKNOWN_CONTRACT_LENGTH: {} 个月无费率, 改用 {} 个月",
                requested, used
            ),
            QuoteWarning::UsePriceNotBilled { requested } => {
                write!(f, "USE_PRICE_NOT_BILLED: 忽略单次价格编辑 {}", requested)
            }
        }
    }
}

// ==========================================
// 推导结果组成部分
// ==========================================

/// 融资成本报价 (月)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancingQuote {
    pub min: f64,
    pub standard: f64,
    pub max: f64,
    pub active: f64,
}

impl FinancingQuote {
    /// 区间是否退化为单点
    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }
}

/// 单次耗材价格报价
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditQuote {
    pub min: f64,
    pub max: f64,
    pub active: f64,
}

/// 包月状态
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatrateStatus {
    pub requested: bool,
    pub eligible: bool,
    pub active: bool,
    pub threshold: Option<f64>, // 融资模式下的融资成本门槛
    pub reasons: Vec<String>,
}

/// 月运营成本拆分
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatingCostBreakdown {
    pub consumable_cost: f64,
    pub service_cost: f64,
    pub total: f64,
    pub using_flatrate: bool,
}

/// 含税/不含税金额对
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueAmount {
    pub tax_inclusive: f64,
    pub tax_exclusive: f64,
}

/// 占用率情景 (年收入, 含税)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OccupancyScenarios {
    pub half: f64,
    pub three_quarters: f64,
    pub full: f64,
}

/// 多周期收入
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    pub daily: RevenueAmount,
    pub weekly: RevenueAmount,
    pub monthly: RevenueAmount,
    pub yearly: RevenueAmount,
    pub occupancy: OccupancyScenarios,
}

/// 净利润 (不含税)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetResult {
    pub per_month: f64,
    pub per_year: f64,
}

// ==========================================
// PricingState - 跨推导携带的唯一状态
// ==========================================
// 设备或合同期限变化时重置为标准档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingState {
    pub equipment_id: String,
    pub contract_months: u32,
    pub position: PricingPosition,
}

impl PricingState {
    /// 是否仍适用于给定的设备与期限
    pub fn applies_to(&self, equipment_id: &str, contract_months: u32) -> bool {
        self.equipment_id == equipment_id && self.contract_months == contract_months
    }
}

// ==========================================
// QuoteSnapshot - 一次推导的完整结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    // ===== 输入回显 =====
    pub equipment_id: String,
    pub payment_mode: PaymentMode,
    pub service_tier: ServiceTier,
    pub contract_months: u32,
    pub uses_per_day: f64,
    pub price_per_use: f64,

    // ===== 汇率与设备价 =====
    pub exchange_rate: f64,
    pub rate_origin: RateOrigin,
    pub equipment_price_local: f64,

    // ===== 投资位置 =====
    pub position: PricingPosition,
    pub position_step: PricingStep,

    // ===== 推导值 =====
    pub insurance_premium: f64,
    pub financing: FinancingQuote,
    pub credit: CreditQuote,
    pub flatrate: FlatrateStatus,
    pub operating_cost: OperatingCostBreakdown,
    pub revenue: RevenueBreakdown,
    pub amortized_cost: f64,
    pub net: NetResult,

    // ===== 补充指标 =====
    pub total_financing_over_contract: f64,
    pub break_even_uses_per_day: Option<f64>,

    pub warnings: Vec<QuoteWarning>,
}

impl QuoteSnapshot {
    /// 全零快照（设备缺失/非法时返回,而不是失败）
    pub fn zeroed(
        equipment_id: impl Into<String>,
        exchange_rate: f64,
        rate_origin: RateOrigin,
        warnings: Vec<QuoteWarning>,
    ) -> Self {
        Self {
            equipment_id: equipment_id.into(),
            payment_mode: PaymentMode::default(),
            service_tier: ServiceTier::default(),
            contract_months: 0,
            uses_per_day: 0.0,
            price_per_use: 0.0,
            exchange_rate,
            rate_origin,
            equipment_price_local: 0.0,
            position: PricingPosition::default(),
            position_step: PricingStep::Standard,
            insurance_premium: 0.0,
            financing: FinancingQuote::default(),
            credit: CreditQuote::default(),
            flatrate: FlatrateStatus::default(),
            operating_cost: OperatingCostBreakdown::default(),
            revenue: RevenueBreakdown::default(),
            amortized_cost: 0.0,
            net: NetResult::default(),
            total_financing_over_contract: 0.0,
            break_even_uses_per_day: None,
            warnings,
        }
    }
}

/// 推导结果 + 需携带到下一次推导的状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteOutcome {
    pub snapshot: QuoteSnapshot,
    pub state: Option<PricingState>,
}
