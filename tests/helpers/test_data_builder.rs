// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use equipment_quote::config::PricingSettings;
use equipment_quote::domain::{EquipmentProfile, EquipmentRecord};
use equipment_quote::engine::{validate_record, EquipmentCatalog, PricingOrchestrator};
use std::sync::Arc;

/// 测试汇率 (EUR → NOK)
pub const TEST_RATE: f64 = 11.4926;

// ==========================================
// EquipmentRecord 构建器
// ==========================================

pub struct EquipmentBuilder {
    record: EquipmentRecord,
}

impl EquipmentBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            record: EquipmentRecord {
                id: id.to_string(),
                display_name: id.to_string(),
                foreign_price: 10_000.0,
                uses_credits: false,
                credit_min: None,
                credit_max: None,
                financing_min: None,
                financing_standard: None,
                financing_max: None,
                flatrate_amount: 0.0,
                uses_per_treatment: 1.0,
                default_contract_months: None,
                default_retail_price: 0.0,
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.record.display_name = name.to_string();
        self
    }

    pub fn price(mut self, foreign_price: f64) -> Self {
        self.record.foreign_price = foreign_price;
        self
    }

    pub fn credits(mut self, min: f64, max: f64) -> Self {
        self.record.uses_credits = true;
        self.record.credit_min = Some(min);
        self.record.credit_max = Some(max);
        self
    }

    pub fn financing(mut self, min: f64, standard: f64, max: f64) -> Self {
        self.record.financing_min = Some(min);
        self.record.financing_standard = Some(standard);
        self.record.financing_max = Some(max);
        self
    }

    pub fn flatrate(mut self, amount: f64) -> Self {
        self.record.flatrate_amount = amount;
        self
    }

    pub fn uses_per_treatment(mut self, uses: f64) -> Self {
        self.record.uses_per_treatment = uses;
        self
    }

    pub fn contract_months(mut self, months: u32) -> Self {
        self.record.default_contract_months = Some(months);
        self
    }

    pub fn retail_price(mut self, price: f64) -> Self {
        self.record.default_retail_price = price;
        self
    }

    pub fn build(self) -> EquipmentRecord {
        self.record
    }

    pub fn profile(self) -> EquipmentProfile {
        validate_record(&self.record).unwrap()
    }
}

// ==========================================
// 标准测试设备
// ==========================================

/// 按耗材计费, 带显式融资区间
pub fn laser() -> EquipmentRecord {
    EquipmentBuilder::new("LASER-X")
        .name("Laser X")
        .price(95_000.0)
        .credits(149.0, 199.0)
        .financing(10_736.0, 11_892.0, 15_600.0)
        .flatrate(4_500.0)
        .contract_months(60)
        .retail_price(2_500.0)
        .build()
}

/// 不按耗材计费, 融资区间按费率推导
pub fn cryo() -> EquipmentRecord {
    EquipmentBuilder::new("CRYO-1")
        .name("Cryo One")
        .price(1_500.0)
        .retail_price(900.0)
        .build()
}

/// 显式区间退化为单点
pub fn fixed() -> EquipmentRecord {
    EquipmentBuilder::new("FIXED-1")
        .name("Fixed Band")
        .price(40_000.0)
        .credits(99.0, 99.0)
        .financing(5_000.0, 5_000.0, 5_000.0)
        .retail_price(1_200.0)
        .build()
}

pub fn standard_catalog() -> EquipmentCatalog {
    EquipmentCatalog::from_records(&[laser(), cryo(), fixed()]).unwrap()
}

pub fn orchestrator() -> PricingOrchestrator {
    orchestrator_with(PricingSettings::default())
}

pub fn orchestrator_with(settings: PricingSettings) -> PricingOrchestrator {
    PricingOrchestrator::new(Arc::new(standard_catalog()), Arc::new(settings))
}
