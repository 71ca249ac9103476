// ==========================================
// 设备成本报价系统 - 配置层
// ==========================================
// 职责: 定价参数管理, 读取接口与存储实现分离
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod pricing_config_trait;
pub mod settings;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use pricing_config_trait::PricingConfigReader;
pub use settings::{BandMultipliers, PricingSettings, TariffTable};
