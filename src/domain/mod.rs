// ==========================================
// 设备成本报价系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、报价快照
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod equipment;
pub mod quote;
pub mod rate;
pub mod tariff;
pub mod types;

// 重导出核心类型
pub use equipment::{CreditBand, EquipmentProfile, EquipmentRecord, FinancingBand};
pub use quote::{
    CreditQuote, FinancingQuote, FlatrateStatus, NetResult, OccupancyScenarios,
    OperatingCostBreakdown, PricingEdit, PricingState, QuoteInput, QuoteOutcome, QuoteSnapshot,
    QuoteWarning, RevenueAmount, RevenueBreakdown,
};
pub use rate::{RateOrigin, RateQuote};
pub use tariff::TariffEntry;
pub use types::{PaymentMode, PricingPosition, PricingStep, ServiceTier};
