// ==========================================
// 设备成本报价系统 - 报价 API
// ==========================================
// 职责: 汇率获取 + 目录查询 + 编排器推导, 对外唯一入口
// 说明: 编排器本身是同步纯计算, 只有汇率获取会挂起
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::settings::PricingSettings;
use crate::domain::quote::{PricingState, QuoteInput, QuoteOutcome, QuoteWarning};
use crate::domain::rate::RateQuote;
use crate::engine::orchestrator::PricingOrchestrator;
use crate::importer::catalog_importer::{CatalogImporter, ImportSummary};
use crate::rates::provider::CachedRateProvider;
use crate::rates::source::ExchangeRateSource;
use crate::repository::equipment_repo::EquipmentRepository;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{info, instrument};

/// 设备列表项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSummary {
    pub equipment_id: String,
    pub display_name: String,
    pub foreign_price: f64,
    pub uses_credits: bool,
    pub has_explicit_band: bool,
    pub default_contract_months: Option<u32>,
}

/// 融资区间查询结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingBandView {
    pub equipment_id: String,
    pub contract_months: u32,
    pub min: f64,
    pub standard: f64,
    pub max: f64,
    pub insurance_premium: f64,
    pub exchange_rate: f64,
    pub warnings: Vec<QuoteWarning>,
}

// ==========================================
// QuoteApi
// ==========================================
pub struct QuoteApi {
    repo: Arc<EquipmentRepository>,
    settings: Arc<PricingSettings>,
    rates: Arc<CachedRateProvider<dyn ExchangeRateSource>>,
    orchestrator: RwLock<Arc<PricingOrchestrator>>,
}

impl QuoteApi {
    /// 创建报价 API (立即加载并校验设备目录)
    pub fn new(
        repo: Arc<EquipmentRepository>,
        settings: Arc<PricingSettings>,
        rates: Arc<CachedRateProvider<dyn ExchangeRateSource>>,
    ) -> ApiResult<Self> {
        let catalog = Arc::new(repo.load_catalog()?);
        let orchestrator = PricingOrchestrator::new(catalog, settings.clone());

        Ok(Self {
            repo,
            settings,
            rates,
            orchestrator: RwLock::new(Arc::new(orchestrator)),
        })
    }

    fn orchestrator(&self) -> ApiResult<Arc<PricingOrchestrator>> {
        self.orchestrator
            .read()
            .map(|guard| guard.clone())
            .map_err(|e| ApiError::LockError(e.to_string()))
    }

    pub fn settings(&self) -> &PricingSettings {
        &self.settings
    }

    /// 当前汇率 (缓存/实时/兜底)
    pub async fn current_rate(&self) -> RateQuote {
        self.rates.current_rate().await
    }

    /// 报价推导
    ///
    /// # 参数
    /// - input: 输入向量
    /// - carried: 上一次推导返回的状态
    ///
    /// # 返回
    /// - Ok(QuoteOutcome): 设备不存在时为全零快照 + UNKNOWN_EQUIPMENT 告警
    /// - Err(Configuration): 配置错误
    #[instrument(skip(self, input, carried), fields(equipment_id = %input.equipment_id))]
    pub async fn quote(
        &self,
        input: &QuoteInput,
        carried: Option<&PricingState>,
    ) -> ApiResult<QuoteOutcome> {
        let rate = self.rates.current_rate().await;
        let orchestrator = self.orchestrator()?;
        Ok(orchestrator.derive(input, &rate, carried)?)
    }

    /// 设备列表 (按 id 升序)
    pub fn list_equipment(&self) -> ApiResult<Vec<EquipmentSummary>> {
        let orchestrator = self.orchestrator()?;
        Ok(orchestrator
            .catalog()
            .profiles()
            .map(|p| EquipmentSummary {
                equipment_id: p.id.clone(),
                display_name: p.display_name.clone(),
                foreign_price: p.foreign_price,
                uses_credits: p.uses_credits,
                has_explicit_band: p.financing.is_some(),
                default_contract_months: p.default_contract_months,
            })
            .collect())
    }

    /// 查询融资区间
    ///
    /// # 返回
    /// - Err(NotFound): 设备不存在
    #[instrument(skip(self))]
    pub async fn financing_band(
        &self,
        equipment_id: &str,
        contract_months: Option<u32>,
        insurance: bool,
    ) -> ApiResult<FinancingBandView> {
        let rate = self.rates.current_rate().await;
        let orchestrator = self.orchestrator()?;

        let (range, months_warning) = orchestrator
            .financing_range(equipment_id, contract_months, insurance, rate.rate)
            .ok_or_else(|| ApiError::NotFound(format!("设备 {}", equipment_id)))?;

        let mut warnings: Vec<QuoteWarning> = months_warning.into_iter().collect();
        if range.is_degenerate() {
            warnings.push(QuoteWarning::DegenerateRange {
                value: range.band.min,
            });
        }

        Ok(FinancingBandView {
            equipment_id: equipment_id.trim().to_string(),
            contract_months: range.contract_months,
            min: range.band.min,
            standard: range.band.standard,
            max: range.band.max,
            insurance_premium: range.insurance_premium,
            exchange_rate: rate.rate,
            warnings,
        })
    }

    /// 从仓储重新加载目录
    ///
    /// # 返回
    /// - Ok(usize): 设备数量
    pub fn reload_catalog(&self) -> ApiResult<usize> {
        let catalog = Arc::new(self.repo.load_catalog()?);
        let count = catalog.len();
        let orchestrator = Arc::new(PricingOrchestrator::new(catalog, self.settings.clone()));

        let mut guard = self
            .orchestrator
            .write()
            .map_err(|e| ApiError::LockError(e.to_string()))?;
        *guard = orchestrator;

        info!(equipment_count = count, "设备目录已重新加载");
        Ok(count)
    }

    /// 导入目录文件并重新加载
    pub fn import_catalog<P: AsRef<Path>>(&self, path: P) -> ApiResult<ImportSummary> {
        let importer = CatalogImporter::new(self.repo.clone());
        let summary = importer.import_file(path)?;
        self.reload_catalog()?;
        Ok(summary)
    }
}
