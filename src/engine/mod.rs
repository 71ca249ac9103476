// ==========================================
// 设备成本报价系统 - 引擎层
// ==========================================
// 职责: 实现定价推导规则, 全部为纯计算
// 红线: Engine 不访问数据库、不发起网络请求
//       可恢复异常以告警输出, 只有配置错误返回 Err
// ==========================================

pub mod catalog;
pub mod error;
pub mod financing_range;
pub mod flatrate;
pub mod insurance;
pub mod interpolator;
pub mod net_result;
pub mod operating_cost;
pub mod orchestrator;
pub mod position_resolver;
pub mod revenue;
pub mod rounding;

// 重导出核心引擎
pub use catalog::{validate_record, EquipmentCatalog};
pub use error::{EngineError, EngineResult};
pub use financing_range::{FinancingRange, FinancingRangeCalculator};
pub use flatrate::{FlatrateEligibility, FlatrateEligibilityEvaluator, FlatrateRequest};
pub use insurance::InsuranceCostCalculator;
pub use interpolator::{Breakpoint, InterpolatedPoint, PricingInterpolator};
pub use net_result::NetResultCalculator;
pub use operating_cost::{OperatingCostCalculator, OperatingCostInput};
pub use orchestrator::{PricingOrchestrator, QuoteSession};
pub use position_resolver::PricingPositionResolver;
pub use revenue::RevenueCalculator;
pub use rounding::RoundingPolicy;
