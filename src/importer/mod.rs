// ==========================================
// 设备成本报价系统 - 导入层
// ==========================================
// 职责: 外部设备目录导入
// 支持: CSV, JSON
// ==========================================

pub mod catalog_importer;
pub mod error;
pub mod field_mapper;
pub mod file_parser;

// 重导出核心类型
pub use catalog_importer::{CatalogImporter, ImportSummary};
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{parse_csv, parse_json, CatalogFormat, RawRow};
