// ==========================================
// 设备成本报价系统 - 设备目录
// ==========================================
// 职责: 校验目录原始记录并构建不可变设备档案集合
// 红线: 记录缺少计费方式所需字段 → 配置错误, 整个目录构建失败
//       构建完成后只读, 推导过程不修改任何档案
// ==========================================

use crate::domain::equipment::{CreditBand, EquipmentProfile, EquipmentRecord, FinancingBand};
use crate::engine::error::{EngineError, EngineResult};
use std::collections::BTreeMap;
use tracing::info;

// ==========================================
// 记录校验
// ==========================================

fn require_finite(equipment_id: &str, field: &str, value: f64) -> EngineResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::NonFiniteValue {
            field: format!("{}.{}", equipment_id, field),
            value,
        })
    }
}

fn require_field(equipment_id: &str, field: &str, value: Option<f64>) -> EngineResult<f64> {
    let value = value.ok_or_else(|| EngineError::MissingField {
        equipment_id: equipment_id.to_string(),
        field: field.to_string(),
    })?;
    require_finite(equipment_id, field, value)
}

/// 把一条目录记录校验为设备档案
///
/// # 规则
/// - id 非空, 外币价 >= 0
/// - 按耗材计费: credit_min/credit_max 必填, 0 < min <= max
/// - 显式融资区间: 三个值同时出现或同时缺失, 0 <= min <= standard <= max
/// - uses_per_treatment > 0
pub fn validate_record(record: &EquipmentRecord) -> EngineResult<EquipmentProfile> {
    let id = record.id.trim();
    if id.is_empty() {
        return Err(EngineError::MissingField {
            equipment_id: String::new(),
            field: "id".to_string(),
        });
    }

    let foreign_price = require_finite(id, "foreign_price", record.foreign_price)?;
    if foreign_price < 0.0 {
        return Err(EngineError::InvalidBand {
            equipment_id: id.to_string(),
            message: format!("foreign_price={} 不能为负", foreign_price),
        });
    }

    let credit = if record.uses_credits {
        let min = require_field(id, "credit_min", record.credit_min)?;
        let max = require_field(id, "credit_max", record.credit_max)?;
        if !(min > 0.0 && min <= max) {
            return Err(EngineError::InvalidBand {
                equipment_id: id.to_string(),
                message: format!("credit 区间非法: min={}, max={}", min, max),
            });
        }
        Some(CreditBand { min, max })
    } else {
        None
    };

    let financing = match (
        record.financing_min,
        record.financing_standard,
        record.financing_max,
    ) {
        (None, None, None) => None,
        (min, standard, max) => {
            let min = require_field(id, "financing_min", min)?;
            let standard = require_field(id, "financing_standard", standard)?;
            let max = require_field(id, "financing_max", max)?;
            if !(min >= 0.0 && min <= standard && standard <= max) {
                return Err(EngineError::InvalidBand {
                    equipment_id: id.to_string(),
                    message: format!(
                        "financing 区间非法: min={}, standard={}, max={}",
                        min, standard, max
                    ),
                });
            }
            Some(FinancingBand { min, standard, max })
        }
    };

    let uses_per_treatment = require_finite(id, "uses_per_treatment", record.uses_per_treatment)?;
    if uses_per_treatment <= 0.0 {
        return Err(EngineError::InvalidBand {
            equipment_id: id.to_string(),
            message: format!("uses_per_treatment={} 必须为正", uses_per_treatment),
        });
    }

    Ok(EquipmentProfile {
        id: id.to_string(),
        display_name: record.display_name.trim().to_string(),
        foreign_price,
        uses_credits: record.uses_credits,
        credit,
        financing,
        flatrate_amount: require_finite(id, "flatrate_amount", record.flatrate_amount)?.max(0.0),
        uses_per_treatment,
        default_contract_months: record.default_contract_months,
        default_retail_price: require_finite(id, "default_retail_price", record.default_retail_price)?
            .max(0.0),
    })
}

// ==========================================
// EquipmentCatalog
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EquipmentCatalog {
    profiles: BTreeMap<String, EquipmentProfile>,
}

impl EquipmentCatalog {
    /// 从原始记录构建目录
    ///
    /// # 返回
    /// - Err: 任一记录非法或 id 重复
    pub fn from_records(records: &[EquipmentRecord]) -> EngineResult<Self> {
        let mut profiles = BTreeMap::new();
        for record in records {
            let profile = validate_record(record)?;
            if profiles.contains_key(&profile.id) {
                return Err(EngineError::DuplicateEquipment(profile.id));
            }
            profiles.insert(profile.id.clone(), profile);
        }

        info!(equipment_count = profiles.len(), "设备目录构建完成");
        Ok(Self { profiles })
    }

    pub fn from_profiles(profiles: Vec<EquipmentProfile>) -> Self {
        Self {
            profiles: profiles.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn get(&self, equipment_id: &str) -> Option<&EquipmentProfile> {
        self.profiles.get(equipment_id.trim())
    }

    /// 按 id 升序
    pub fn profiles(&self) -> impl Iterator<Item = &EquipmentProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
