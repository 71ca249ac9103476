// ==========================================
// 设备成本报价系统 - API 层
// ==========================================
// 职责: 对外业务接口, 组装仓储/配置/汇率/引擎
// 红线: API 层不实现定价规则
// ==========================================

pub mod error;
pub mod quote_api;

pub use error::{ApiError, ApiResult};
pub use quote_api::{EquipmentSummary, FinancingBandView, QuoteApi};
