// ==========================================
// 设备成本报价系统 - 设备目录仓储
// ==========================================
// 职责: equipment_catalog 表的 CRUD
// 红线: Repository 不含业务逻辑, 校验交给引擎层目录构建
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::domain::equipment::EquipmentRecord;
use crate::engine::catalog::EquipmentCatalog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const SELECT_COLUMNS: &str = r#"
    equipment_id, display_name, foreign_price, uses_credits,
    credit_min, credit_max,
    financing_min, financing_standard, financing_max,
    flatrate_amount, uses_per_treatment, default_contract_months, default_retail_price
"#;

// ==========================================
// EquipmentRepository - 设备目录仓储
// ==========================================
pub struct EquipmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EquipmentRepository {
    /// 创建新的 EquipmentRepository 实例 (必要时建表)
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            init_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<EquipmentRecord> {
        Ok(EquipmentRecord {
            id: row.get(0)?,
            display_name: row.get(1)?,
            foreign_price: row.get(2)?,
            uses_credits: row.get::<_, i64>(3)? != 0,
            credit_min: row.get(4)?,
            credit_max: row.get(5)?,
            financing_min: row.get(6)?,
            financing_standard: row.get(7)?,
            financing_max: row.get(8)?,
            flatrate_amount: row.get(9)?,
            uses_per_treatment: row.get(10)?,
            default_contract_months: row.get(11)?,
            default_retail_price: row.get(12)?,
        })
    }

    fn upsert_with(conn: &Connection, record: &EquipmentRecord) -> rusqlite::Result<usize> {
        conn.execute(
            r#"
            INSERT INTO equipment_catalog (
                equipment_id, display_name, foreign_price, uses_credits,
                credit_min, credit_max,
                financing_min, financing_standard, financing_max,
                flatrate_amount, uses_per_treatment, default_contract_months, default_retail_price,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT(equipment_id) DO UPDATE SET
                display_name = excluded.display_name,
                foreign_price = excluded.foreign_price,
                uses_credits = excluded.uses_credits,
                credit_min = excluded.credit_min,
                credit_max = excluded.credit_max,
                financing_min = excluded.financing_min,
                financing_standard = excluded.financing_standard,
                financing_max = excluded.financing_max,
                flatrate_amount = excluded.flatrate_amount,
                uses_per_treatment = excluded.uses_per_treatment,
                default_contract_months = excluded.default_contract_months,
                default_retail_price = excluded.default_retail_price,
                updated_at = excluded.updated_at
            "#,
            params![
                record.id.trim(),
                record.display_name,
                record.foreign_price,
                record.uses_credits as i64,
                record.credit_min,
                record.credit_max,
                record.financing_min,
                record.financing_standard,
                record.financing_max,
                record.flatrate_amount,
                record.uses_per_treatment,
                record.default_contract_months,
                record.default_retail_price,
                Utc::now().to_rfc3339(),
            ],
        )
    }

    /// 插入或更新单条记录
    pub fn upsert(&self, record: &EquipmentRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        Self::upsert_with(&conn, record)?;
        debug!(equipment_id = %record.id, "设备记录已写入");
        Ok(())
    }

    /// 批量写入 (单事务)
    ///
    /// # 返回
    /// - Ok(usize): 写入条数
    pub fn upsert_batch(&self, records: &[EquipmentRecord]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut count = 0;
        for record in records {
            count += Self::upsert_with(&tx, record)?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(count, "设备记录批量写入完成");
        Ok(count)
    }

    /// 按 id 查询
    pub fn find_by_id(&self, equipment_id: &str) -> RepositoryResult<Option<EquipmentRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM equipment_catalog WHERE equipment_id = ?1",
            SELECT_COLUMNS
        );

        match conn.query_row(&sql, params![equipment_id.trim()], Self::map_row) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询全部记录 (按 id 升序)
    pub fn list_all(&self) -> RepositoryResult<Vec<EquipmentRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM equipment_catalog ORDER BY equipment_id",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// 删除记录
    ///
    /// # 返回
    /// - Err(NotFound): 记录不存在
    pub fn delete(&self, equipment_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM equipment_catalog WHERE equipment_id = ?1",
            params![equipment_id.trim()],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Equipment".to_string(),
                id: equipment_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM equipment_catalog", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// 读取全部记录并构建已校验的设备目录
    ///
    /// # 返回
    /// - Err(CatalogConfiguration): 任一记录不满足计费方式要求
    pub fn load_catalog(&self) -> RepositoryResult<EquipmentCatalog> {
        let records = self.list_all()?;
        Ok(EquipmentCatalog::from_records(&records)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> EquipmentRepository {
        let conn = Connection::open_in_memory().unwrap();
        EquipmentRepository::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    fn record(id: &str) -> EquipmentRecord {
        EquipmentRecord {
            id: id.to_string(),
            display_name: format!("Device {}", id),
            foreign_price: 20_000.0,
            uses_credits: false,
            credit_min: None,
            credit_max: None,
            financing_min: None,
            financing_standard: None,
            financing_max: None,
            flatrate_amount: 0.0,
            uses_per_treatment: 1.0,
            default_contract_months: Some(36),
            default_retail_price: 800.0,
        }
    }

    #[test]
    fn test_upsert_find_delete() {
        let repo = repo();
        repo.upsert(&record("A")).unwrap();
        assert_eq!(repo.find_by_id("A").unwrap(), Some(record("A")));

        let mut updated = record("A");
        updated.foreign_price = 25_000.0;
        repo.upsert(&updated).unwrap();
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.find_by_id("A").unwrap().map(|r| r.foreign_price), Some(25_000.0));

        repo.delete("A").unwrap();
        assert!(repo.find_by_id("A").unwrap().is_none());
        assert!(matches!(repo.delete("A"), Err(RepositoryError::NotFound { .. })));
    }

    #[test]
    fn test_load_catalog_validates() {
        let repo = repo();
        repo.upsert_batch(&[record("B"), record("A")]).unwrap();
        let ids: Vec<_> = repo.list_all().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(repo.load_catalog().unwrap().len(), 2);

        let mut broken = record("C");
        broken.uses_credits = true;
        repo.upsert(&broken).unwrap();
        assert!(matches!(
            repo.load_catalog(),
            Err(RepositoryError::CatalogConfiguration(_))
        ));
    }
}
