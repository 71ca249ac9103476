// ==========================================
// 设备成本报价系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 配置错误在构造阶段即失败,不做静默恢复
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ===== 插值断点配置错误 =====
    #[error("断点数量不足: 需要至少 {required} 个, 实际 {actual} 个")]
    NotEnoughBreakpoints { required: usize, actual: usize },

    #[error("断点位置未严格递增: 第 {index} 个断点 position={position}")]
    UnorderedBreakpoints { index: usize, position: f64 },

    #[error("断点违反单调性 (第 {index} 个断点): {message}")]
    NonMonotonicBreakpoints { index: usize, message: String },

    #[error("数值非法 (field={field}): {value}")]
    NonFiniteValue { field: String, value: f64 },

    // ===== 目录记录配置错误 =====
    #[error("设备 {equipment_id} 缺少必填字段: {field}")]
    MissingField { equipment_id: String, field: String },

    #[error("设备 {equipment_id} 区间配置非法: {message}")]
    InvalidBand {
        equipment_id: String,
        message: String,
    },

    #[error("设备 ID 重复: {0}")]
    DuplicateEquipment(String),

    // ===== 费率表配置错误 =====
    #[error("费率表为空")]
    EmptyTariffTable,

    #[error("费率表缺少基准期限 {0} 个月")]
    MissingReferenceTariff(u32),

    #[error("费率表条目非法 (contract_months={contract_months}): rate={rate}")]
    InvalidTariff { contract_months: u32, rate: f64 },

    // ===== 非致命: 非法编辑 =====
    #[error("设备 {0} 不按耗材计费, 不支持编辑单次价格")]
    UsePriceNotBilled(String),
}

impl EngineError {
    /// 是否属于配置错误（构造期致命错误）
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, EngineError::UsePriceNotBilled(_))
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
