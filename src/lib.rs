// ==========================================
// 设备成本报价系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + tokio
// 系统定位: 设备融资/采购报价推导
//           (融资成本 ↔ 单次耗材价 双向联动)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 定价规则
pub mod engine;

// 导入层 - 设备目录
pub mod importer;

// 配置层 - 定价参数
pub mod config;

// 汇率层 - 外部汇率源
pub mod rates;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{PaymentMode, PricingPosition, PricingStep, ServiceTier};

// 领域实体
pub use domain::{
    EquipmentProfile, EquipmentRecord, PricingEdit, PricingState, QuoteInput, QuoteOutcome,
    QuoteSnapshot, QuoteWarning, RateOrigin, RateQuote,
};

// 引擎
pub use engine::{
    EngineError, EquipmentCatalog, PricingInterpolator, PricingOrchestrator,
    PricingPositionResolver, QuoteSession, RoundingPolicy,
};

// 配置
pub use config::{ConfigManager, PricingConfigReader, PricingSettings};

// API
pub use api::{ApiError, QuoteApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "设备成本报价系统";

// 数据库版本
pub const DB_VERSION: &str = "v1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(DB_VERSION, format!("v{}", db::CURRENT_SCHEMA_VERSION));
    }
}
