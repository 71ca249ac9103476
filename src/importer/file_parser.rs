// ==========================================
// 设备成本报价系统 - 目录文件解析
// ==========================================
// 支持: CSV (.csv) / JSON (.json)
// 输出: 原始行 (表头 → 单元格) 或直接反序列化的记录
// ==========================================

use crate::domain::equipment::EquipmentRecord;
use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 目录文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Csv,
    Json,
}

impl CatalogFormat {
    /// 按扩展名识别格式
    pub fn detect(path: &Path) -> ImportResult<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(CatalogFormat::Csv),
            "json" => Ok(CatalogFormat::Json),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// CSV 原始行 (行号从 2 开始, 第 1 行为表头)
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row: usize,
    pub cells: HashMap<String, String>,
}

// ==========================================
// CSV
// ==========================================

/// 从任意 Reader 解析 CSV
///
/// 表头与单元格去除首尾空白, 完全空白的行跳过
pub fn parse_csv<R: Read>(reader: R) -> ImportResult<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // 允许行长度不一致
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let mut cells = HashMap::new();

        for (col_idx, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                cells.insert(header.clone(), value.trim().to_string());
            }
        }

        // 跳过完全空白的行
        if cells.values().all(|v| v.is_empty()) {
            continue;
        }

        rows.push(RawRow { row: idx + 2, cells });
    }

    Ok(rows)
}

pub fn parse_csv_file(path: &Path) -> ImportResult<Vec<RawRow>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    parse_csv(File::open(path)?)
}

// ==========================================
// JSON
// ==========================================

/// 解析 JSON 记录列表: [{"id": ..., "display_name": ..., ...}]
pub fn parse_json(content: &str) -> ImportResult<Vec<EquipmentRecord>> {
    Ok(serde_json::from_str(content)?)
}

pub fn parse_json_file(path: &Path) -> ImportResult<Vec<EquipmentRecord>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    parse_json(&content)
}
