// ==========================================
// 设备成本报价系统 - 融资费率条目
// ==========================================

use serde::{Deserialize, Serialize};

/// 费率表条目: 合同期限 → 月融资费率(百分比因子, 如 2.25 表示采购价的 2.25%/月)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TariffEntry {
    pub contract_months: u32,
    pub rate: f64,
}

impl TariffEntry {
    pub fn new(contract_months: u32, rate: f64) -> Self {
        Self {
            contract_months,
            rate,
        }
    }
}
