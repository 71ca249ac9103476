// ==========================================
// 设备成本报价系统 - 设备领域模型
// ==========================================
// 职责: 设备目录原始记录 + 校验后的不可变设备档案
// 红线: 不含数据访问逻辑,不含定价逻辑
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// EquipmentRecord - 目录原始记录
// ==========================================
// 用途: 导入/仓储层的原始形态,可选字段按计费方式决定是否必填
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub id: String,
    pub display_name: String,
    pub foreign_price: f64,              // 外币采购价
    #[serde(default)]
    pub uses_credits: bool,              // 是否按耗材点数计费
    #[serde(default)]
    pub credit_min: Option<f64>,         // 单次价格下限 (uses_credits 时必填)
    #[serde(default)]
    pub credit_max: Option<f64>,         // 单次价格上限 (uses_credits 时必填)
    #[serde(default)]
    pub financing_min: Option<f64>,      // 显式融资区间 (三者同时出现或同时缺失)
    #[serde(default)]
    pub financing_standard: Option<f64>,
    #[serde(default)]
    pub financing_max: Option<f64>,
    #[serde(default)]
    pub flatrate_amount: f64,            // 包月耗材金额
    #[serde(default = "default_uses_per_treatment")]
    pub uses_per_treatment: f64,         // 每次治疗消耗点数
    #[serde(default)]
    pub default_contract_months: Option<u32>,
    #[serde(default)]
    pub default_retail_price: f64,       // 默认单次零售价 (含税)
}

fn default_uses_per_treatment() -> f64 {
    1.0
}

// ==========================================
// CreditBand - 单次价格区间
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditBand {
    pub min: f64,
    pub max: f64,
}

impl CreditBand {
    /// 标准价（区间中点,未取整）
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

// ==========================================
// FinancingBand - 融资成本区间
// ==========================================
// 不变量: min <= standard <= max
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancingBand {
    pub min: f64,
    pub standard: f64,
    pub max: f64,
}

impl FinancingBand {
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            min: self.min * factor,
            standard: self.standard * factor,
            max: self.max * factor,
        }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

// ==========================================
// EquipmentProfile - 设备档案 (校验后,不可变)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentProfile {
    pub id: String,
    pub display_name: String,
    pub foreign_price: f64,
    pub uses_credits: bool,
    pub credit: Option<CreditBand>,      // uses_credits 时必有
    pub financing: Option<FinancingBand>, // 缺失时按费率推导
    pub flatrate_amount: f64,
    pub uses_per_treatment: f64,
    pub default_contract_months: Option<u32>,
    pub default_retail_price: f64,
}

impl EquipmentProfile {
    /// 本币采购价
    pub fn local_price(&self, exchange_rate: f64) -> f64 {
        self.foreign_price * exchange_rate
    }
}
