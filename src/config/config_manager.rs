// ==========================================
// 设备成本报价系统 - 配置管理器
// ==========================================
// 职责: 定价参数的加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// 规则: 缺失或无法解析的值一律回退默认值并告警
// ==========================================

use crate::config::pricing_config_trait::PricingConfigReader;
use crate::config::settings::{defaults, BandMultipliers, TariffTable};
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::tariff::TariffEntry;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例 (必要时建表)
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 并建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            init_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 读取并解析配置值
    ///
    /// 不存在 → 默认值; 解析失败 → 告警 + 默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + Display,
    {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    "配置值无法解析，使用默认值"
                );
                Ok(default)
            }
        }
    }

    /// 写入 global 配置值 (UPSERT)
    pub fn set_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON 格式, 按 key 排序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

// ==========================================
// PricingConfigReader Trait 实现
// ==========================================
#[async_trait]
impl PricingConfigReader for ConfigManager {
    // ===== 税费与营业日 =====

    async fn get_vat_rate(&self) -> Result<f64, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::VAT_RATE, defaults::VAT_RATE)
    }

    async fn get_working_days_per_month(&self) -> Result<f64, Box<dyn Error>> {
        self.get_parsed_or_default(
            config_keys::WORKING_DAYS_PER_MONTH,
            defaults::WORKING_DAYS_PER_MONTH,
        )
    }

    async fn get_days_per_week(&self) -> Result<f64, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::DAYS_PER_WEEK, defaults::DAYS_PER_WEEK)
    }

    // ===== 包月资格 =====

    async fn get_flatrate_min_uses_per_day(&self) -> Result<f64, Box<dyn Error>> {
        self.get_parsed_or_default(
            config_keys::FLATRATE_MIN_USES_PER_DAY,
            defaults::FLATRATE_MIN_USES_PER_DAY,
        )
    }

    async fn get_flatrate_financing_threshold(&self) -> Result<f64, Box<dyn Error>> {
        self.get_parsed_or_default(
            config_keys::FLATRATE_FINANCING_THRESHOLD,
            defaults::FLATRATE_FINANCING_THRESHOLD,
        )
    }

    // ===== 融资与摊销 =====

    async fn get_cash_amortization_months(&self) -> Result<u32, Box<dyn Error>> {
        self.get_parsed_or_default(
            config_keys::CASH_AMORTIZATION_MONTHS,
            defaults::CASH_AMORTIZATION_MONTHS,
        )
    }

    async fn get_reference_contract_months(&self) -> Result<u32, Box<dyn Error>> {
        self.get_parsed_or_default(
            config_keys::REFERENCE_CONTRACT_MONTHS,
            defaults::REFERENCE_CONTRACT_MONTHS,
        )
    }

    async fn get_tariff_entries(&self) -> Result<Vec<TariffEntry>, Box<dyn Error>> {
        let value = match self.get_config_value(config_keys::TARIFF_TABLE)? {
            Some(v) => v,
            None => return Ok(TariffTable::default_entries()),
        };

        let entries: Vec<TariffEntry> = serde_json::from_str(&value).unwrap_or_else(|_| {
            warn!(
                config_key = config_keys::TARIFF_TABLE,
                raw_value = %value,
                "费率表配置格式错误，使用默认费率表"
            );
            TariffTable::default_entries()
        });
        Ok(entries)
    }

    async fn get_band_multipliers(&self) -> Result<BandMultipliers, Box<dyn Error>> {
        let value = match self.get_config_value(config_keys::BAND_MULTIPLIERS)? {
            Some(v) => v,
            None => return Ok(BandMultipliers::default()),
        };

        let multipliers: BandMultipliers = serde_json::from_str(&value).unwrap_or_else(|_| {
            warn!(
                config_key = config_keys::BAND_MULTIPLIERS,
                raw_value = %value,
                "区间倍数配置格式错误，使用默认倍数"
            );
            BandMultipliers::default()
        });
        Ok(multipliers)
    }

    // ===== 汇率 =====

    async fn get_fallback_exchange_rate(&self) -> Result<f64, Box<dyn Error>> {
        let rate = self.get_parsed_or_default(
            config_keys::FALLBACK_EXCHANGE_RATE,
            defaults::FALLBACK_EXCHANGE_RATE,
        )?;
        if rate.is_finite() && rate > 0.0 {
            Ok(rate)
        } else {
            warn!(rate, "兜底汇率非正，使用默认值");
            Ok(defaults::FALLBACK_EXCHANGE_RATE)
        }
    }

    async fn get_exchange_rate_cache_ttl_secs(&self) -> Result<u64, Box<dyn Error>> {
        self.get_parsed_or_default(
            config_keys::EXCHANGE_RATE_CACHE_TTL_SECS,
            defaults::EXCHANGE_RATE_CACHE_TTL_SECS,
        )
    }

    async fn get_exchange_rate_timeout_ms(&self) -> Result<u64, Box<dyn Error>> {
        self.get_parsed_or_default(
            config_keys::EXCHANGE_RATE_TIMEOUT_MS,
            defaults::EXCHANGE_RATE_TIMEOUT_MS,
        )
    }

    async fn get_currency_pair(&self) -> Result<(String, String), Box<dyn Error>> {
        let default_pair = (
            defaults::CURRENCY_FROM.to_string(),
            defaults::CURRENCY_TO.to_string(),
        );
        let value = match self.get_config_value(config_keys::CURRENCY_PAIR)? {
            Some(v) => v,
            None => return Ok(default_pair),
        };

        // 格式: "EUR/NOK"
        let parts: Vec<String> = value
            .split('/')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();

        match parts.as_slice() {
            [from, to] => Ok((from.clone(), to.clone())),
            _ => {
                warn!(
                    config_key = config_keys::CURRENCY_PAIR,
                    raw_value = %value,
                    "货币对配置格式错误，使用默认值"
                );
                Ok(default_pair)
            }
        }
    }

    // ===== 输入合理范围 =====

    async fn get_max_uses_per_day(&self) -> Result<f64, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::MAX_USES_PER_DAY, defaults::MAX_USES_PER_DAY)
    }

    async fn get_max_price_per_use(&self) -> Result<f64, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::MAX_PRICE_PER_USE, defaults::MAX_PRICE_PER_USE)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 税费与营业日
    pub const VAT_RATE: &str = "vat_rate";
    pub const WORKING_DAYS_PER_MONTH: &str = "working_days_per_month";
    pub const DAYS_PER_WEEK: &str = "days_per_week";

    // 包月
    pub const FLATRATE_MIN_USES_PER_DAY: &str = "flatrate_min_uses_per_day";
    pub const FLATRATE_FINANCING_THRESHOLD: &str = "flatrate_financing_threshold";

    // 融资
    pub const CASH_AMORTIZATION_MONTHS: &str = "cash_amortization_months";
    pub const REFERENCE_CONTRACT_MONTHS: &str = "reference_contract_months";
    pub const TARIFF_TABLE: &str = "tariff_table"; // JSON: [{"contract_months":60,"rate":2.25}]
    pub const BAND_MULTIPLIERS: &str = "derived_band_multipliers"; // JSON: {"min":0.9,...}

    // 汇率
    pub const FALLBACK_EXCHANGE_RATE: &str = "fallback_exchange_rate";
    pub const EXCHANGE_RATE_CACHE_TTL_SECS: &str = "exchange_rate_cache_ttl_secs";
    pub const EXCHANGE_RATE_TIMEOUT_MS: &str = "exchange_rate_timeout_ms";
    pub const CURRENCY_PAIR: &str = "currency_pair"; // "EUR/NOK"

    // 输入范围
    pub const MAX_USES_PER_DAY: &str = "max_uses_per_day";
    pub const MAX_PRICE_PER_USE: &str = "max_price_per_use";
}
