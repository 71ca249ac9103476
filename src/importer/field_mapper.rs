// ==========================================
// 设备成本报价系统 - 字段映射
// ==========================================
// 职责: CSV 原始行 → EquipmentRecord
// 规则: 表头不区分大小写, 支持常用别名; 空单元格视为缺省
// ==========================================

use crate::domain::equipment::EquipmentRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use std::str::FromStr;

/// 字段别名表: (标准字段, 可接受的表头)
const FIELD_ALIASES: &[(&str, &[&str])] = &[
    ("id", &["id", "equipment_id"]),
    ("display_name", &["display_name", "name"]),
    ("foreign_price", &["foreign_price", "price", "price_eur"]),
    ("uses_credits", &["uses_credits", "credits"]),
    ("credit_min", &["credit_min"]),
    ("credit_max", &["credit_max"]),
    ("financing_min", &["financing_min"]),
    ("financing_standard", &["financing_standard", "financing_std"]),
    ("financing_max", &["financing_max"]),
    ("flatrate_amount", &["flatrate_amount", "flatrate"]),
    ("uses_per_treatment", &["uses_per_treatment"]),
    ("default_contract_months", &["default_contract_months", "contract_months"]),
    ("default_retail_price", &["default_retail_price", "retail_price"]),
];

pub struct FieldMapper;

impl FieldMapper {
    fn cell<'a>(row: &'a RawRow, field: &str) -> Option<&'a str> {
        let aliases = FIELD_ALIASES
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[]);

        aliases
            .iter()
            .filter_map(|alias| row.cells.get(*alias))
            .map(|v| v.as_str())
            .find(|v| !v.is_empty())
    }

    fn parse_opt<T: FromStr>(row: &RawRow, field: &str) -> ImportResult<Option<T>> {
        match Self::cell(row, field) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|_| ImportError::TypeConversionError {
                    row: row.row,
                    field: field.to_string(),
                    message: format!("无法解析 '{}'", raw),
                }),
        }
    }

    fn parse_bool(row: &RawRow, field: &str) -> ImportResult<bool> {
        match Self::cell(row, field).map(|v| v.to_lowercase()) {
            None => Ok(false),
            Some(v) => match v.as_str() {
                "1" | "true" | "yes" | "y" | "是" => Ok(true),
                "0" | "false" | "no" | "n" | "否" => Ok(false),
                _ => Err(ImportError::TypeConversionError {
                    row: row.row,
                    field: field.to_string(),
                    message: format!("无法解析布尔值 '{}'", v),
                }),
            },
        }
    }

    /// 映射一行
    pub fn map_row(row: &RawRow) -> ImportResult<EquipmentRecord> {
        let id = Self::cell(row, "id")
            .ok_or_else(|| ImportError::FieldMappingError {
                row: row.row,
                message: "缺少 id".to_string(),
            })?
            .to_string();

        let foreign_price = Self::parse_opt::<f64>(row, "foreign_price")?.ok_or_else(|| {
            ImportError::FieldMappingError {
                row: row.row,
                message: format!("设备 {} 缺少 foreign_price", id),
            }
        })?;

        Ok(EquipmentRecord {
            display_name: Self::cell(row, "display_name").unwrap_or(id.as_str()).to_string(),
            foreign_price,
            uses_credits: Self::parse_bool(row, "uses_credits")?,
            credit_min: Self::parse_opt(row, "credit_min")?,
            credit_max: Self::parse_opt(row, "credit_max")?,
            financing_min: Self::parse_opt(row, "financing_min")?,
            financing_standard: Self::parse_opt(row, "financing_standard")?,
            financing_max: Self::parse_opt(row, "financing_max")?,
            flatrate_amount: Self::parse_opt(row, "flatrate_amount")?.unwrap_or(0.0),
            uses_per_treatment: Self::parse_opt(row, "uses_per_treatment")?.unwrap_or(1.0),
            default_contract_months: Self::parse_opt(row, "default_contract_months")?,
            default_retail_price: Self::parse_opt(row, "default_retail_price")?.unwrap_or(0.0),
            id,
        })
    }
}
