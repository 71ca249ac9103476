// ==========================================
// 设备成本报价系统 - 目录导入器
// ==========================================
// 流程: 解析文件 → 字段映射 → 逐条校验 → 查重 → 单事务写入
// 红线: 任一记录非法则整批拒绝, 不做部分导入
// ==========================================

use crate::domain::equipment::EquipmentRecord;
use crate::engine::catalog::validate_record;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{parse_csv_file, parse_json_file, CatalogFormat};
use crate::repository::equipment_repo::EquipmentRepository;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

/// 导入结果摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub source_file: String,
    pub total_rows: usize,
    pub imported: usize,
    pub replaced: usize, // 覆盖已存在的设备
    pub elapsed_ms: u64,
}

pub struct CatalogImporter {
    repo: Arc<EquipmentRepository>,
}

impl CatalogImporter {
    pub fn new(repo: Arc<EquipmentRepository>) -> Self {
        Self { repo }
    }

    /// 解析文件为记录 (附带源行号)
    ///
    /// CSV 行号为文件行号; JSON 为数组下标 + 1
    pub fn parse_file(path: &Path) -> ImportResult<Vec<(usize, EquipmentRecord)>> {
        match CatalogFormat::detect(path)? {
            CatalogFormat::Csv => parse_csv_file(path)?
                .iter()
                .map(|row| FieldMapper::map_row(row).map(|record| (row.row, record)))
                .collect(),
            CatalogFormat::Json => Ok(parse_json_file(path)?
                .into_iter()
                .enumerate()
                .map(|(idx, record)| (idx + 1, record))
                .collect()),
        }
    }

    /// 校验全部记录
    ///
    /// # 返回
    /// - Err(InvalidRecord): 记录不满足计费方式要求
    /// - Err(DuplicateId): 同一文件内 id 重复
    pub fn validate(records: &[(usize, EquipmentRecord)]) -> ImportResult<()> {
        let mut seen = HashSet::new();
        for (row, record) in records {
            let profile = validate_record(record).map_err(|source| ImportError::InvalidRecord {
                row: *row,
                source,
            })?;
            if !seen.insert(profile.id.clone()) {
                return Err(ImportError::DuplicateId {
                    row: *row,
                    id: profile.id,
                });
            }
        }
        Ok(())
    }

    /// 导入目录文件
    #[instrument(skip(self, path), fields(file = %path.as_ref().display()))]
    pub fn import_file<P: AsRef<Path>>(&self, path: P) -> ImportResult<ImportSummary> {
        let started = Instant::now();
        let path = path.as_ref();

        let rows = Self::parse_file(path)?;
        Self::validate(&rows)?;

        let mut replaced = 0;
        for (_, record) in &rows {
            if self.repo.find_by_id(&record.id)?.is_some() {
                replaced += 1;
            }
        }

        let records: Vec<EquipmentRecord> = rows.into_iter().map(|(_, r)| r).collect();
        let imported = self.repo.upsert_batch(&records)?;

        let summary = ImportSummary {
            source_file: path.display().to_string(),
            total_rows: records.len(),
            imported,
            replaced,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            total_rows = summary.total_rows,
            imported = summary.imported,
            replaced = summary.replaced,
            elapsed_ms = summary.elapsed_ms,
            "设备目录导入完成"
        );
        Ok(summary)
    }
}
