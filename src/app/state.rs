// ==========================================
// 设备成本报价系统 - 应用状态
// ==========================================
// 职责: 组装应用级共享资源
// 链路: db_path → ConfigManager → PricingSettings
//       → EquipmentRepository → 汇率提供者 → QuoteApi
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::QuoteApi;
use crate::config::config_manager::ConfigManager;
use crate::config::settings::PricingSettings;
use crate::db::{init_schema, open_sqlite_connection};
use crate::rates::{
    CachedRateProvider, ExchangeRateSource, HttpExchangeRateSource, RateProviderConfig,
    DEFAULT_RATE_API_URL,
};
use crate::repository::equipment_repo::EquipmentRepository;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "EQUIPMENT_QUOTE_DB_PATH";

/// 汇率服务地址环境变量
pub const RATE_URL_ENV: &str = "EQUIPMENT_QUOTE_RATE_URL";

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 定价参数快照 (启动时加载)
    pub settings: Arc<PricingSettings>,

    /// 设备目录仓储
    pub equipment_repo: Arc<EquipmentRepository>,

    /// 报价API
    pub quote_api: Arc<QuoteApi>,
}

/// 启动阶段加载的基础资源
struct Bootstrap {
    conn: Arc<Mutex<Connection>>,
    config_manager: Arc<ConfigManager>,
    settings: PricingSettings,
}

impl AppState {
    /// 创建新的AppState实例 (HTTP 汇率源)
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Err(String): 数据库/配置/目录初始化失败
    pub async fn new(db_path: String) -> Result<Self, String> {
        let base_url = std::env::var(RATE_URL_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_RATE_API_URL.to_string());

        let bootstrap = Self::bootstrap(&db_path).await?;
        let source = HttpExchangeRateSource::new(base_url, bootstrap.settings.exchange_rate_timeout())
            .map_err(|e| format!("无法创建汇率源: {}", e))?;

        Self::assemble(db_path, bootstrap, Arc::new(source))
    }

    /// 使用指定汇率源创建AppState (离线/测试)
    pub async fn with_rate_source(
        db_path: String,
        source: Arc<dyn ExchangeRateSource>,
    ) -> Result<Self, String> {
        let bootstrap = Self::bootstrap(&db_path).await?;
        Self::assemble(db_path, bootstrap, source)
    }

    async fn bootstrap(db_path: &str) -> Result<Bootstrap, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("无法初始化数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建配置管理器: {}", e))?,
        );
        let settings = PricingSettings::load(config_manager.as_ref())
            .await
            .map_err(|e| format!("定价参数加载失败: {}", e))?;

        Ok(Bootstrap {
            conn,
            config_manager,
            settings,
        })
    }

    fn assemble(
        db_path: String,
        bootstrap: Bootstrap,
        source: Arc<dyn ExchangeRateSource>,
    ) -> Result<Self, String> {
        let Bootstrap {
            conn,
            config_manager,
            settings,
        } = bootstrap;

        let equipment_repo = Arc::new(
            EquipmentRepository::from_connection(conn).map_err(|e| format!("无法创建设备仓储: {}", e))?,
        );

        let settings = Arc::new(settings);
        let rates = Arc::new(CachedRateProvider::new(
            source,
            RateProviderConfig::from_settings(&settings),
        ));

        let quote_api = Arc::new(
            QuoteApi::new(equipment_repo.clone(), settings.clone(), rates)
                .map_err(|e| format!("无法创建报价API: {}", e))?,
        );

        tracing::info!(
            equipment_count = quote_api.list_equipment().map(|l| l.len()).unwrap_or(0),
            "AppState初始化成功"
        );

        Ok(Self {
            db_path,
            config_manager,
            settings,
            equipment_repo,
            quote_api,
        })
    }
}

/// 默认数据库路径
///
/// 优先级: 环境变量 → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./equipment_quote.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("equipment-quote");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("equipment_quote.db");
        }
    }

    path.to_string_lossy().to_string()
}
