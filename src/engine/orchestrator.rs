// ==========================================
// 设备成本报价系统 - 定价推导编排器
// ==========================================
// 用途: 按依赖顺序串联全部定价引擎, 一次输入产出一个完整快照
// 顺序: 输入夹取 → 融资区间(含保费) → 投资位置 → 包月资格
//       → 运营成本 → 收入 → 净利润
// 红线: 纯函数式重推导, 除投资位置外不跨推导缓存任何中间结果
//       设备缺失时返回全零快照, 不返回错误
// ==========================================

use crate::config::settings::PricingSettings;
use crate::domain::equipment::EquipmentProfile;
use crate::domain::quote::{
    FlatrateStatus, PricingEdit, PricingState, QuoteInput, QuoteOutcome, QuoteSnapshot,
    QuoteWarning,
};
use crate::domain::rate::{RateOrigin, RateQuote};
use crate::domain::types::{PaymentMode, PricingPosition};
use crate::engine::catalog::EquipmentCatalog;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::financing_range::{FinancingRange, FinancingRangeCalculator};
use crate::engine::flatrate::{FlatrateEligibilityEvaluator, FlatrateRequest};
use crate::engine::net_result::NetResultCalculator;
use crate::engine::operating_cost::{OperatingCostCalculator, OperatingCostInput};
use crate::engine::position_resolver::PricingPositionResolver;
use crate::engine::revenue::RevenueCalculator;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

// ==========================================
// PricingOrchestrator
// ==========================================
pub struct PricingOrchestrator {
    catalog: Arc<EquipmentCatalog>,
    settings: Arc<PricingSettings>,
    flatrate: FlatrateEligibilityEvaluator,
    operating: OperatingCostCalculator,
    revenue: RevenueCalculator,
    net: NetResultCalculator,
}

impl PricingOrchestrator {
    /// 创建编排器
    ///
    /// # 参数
    /// - catalog: 已校验的设备目录 (只读共享)
    /// - settings: 定价参数快照
    pub fn new(catalog: Arc<EquipmentCatalog>, settings: Arc<PricingSettings>) -> Self {
        Self {
            flatrate: FlatrateEligibilityEvaluator::new(
                settings.flatrate_min_uses_per_day,
                settings.flatrate_financing_threshold,
            ),
            operating: OperatingCostCalculator::new(settings.working_days_per_month),
            revenue: RevenueCalculator::new(
                settings.vat_rate,
                settings.days_per_week,
                settings.working_days_per_month,
            ),
            net: NetResultCalculator::new(settings.cash_amortization_months),
            catalog,
            settings,
        }
    }

    pub fn catalog(&self) -> &EquipmentCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &PricingSettings {
        &self.settings
    }

    /// 查询设备在指定期限/保险组合下的融资区间
    ///
    /// # 返回
    /// - None: 设备不存在
    pub fn financing_range(
        &self,
        equipment_id: &str,
        contract_months: Option<u32>,
        insurance: bool,
        exchange_rate: f64,
    ) -> Option<(FinancingRange, Option<QuoteWarning>)> {
        let profile = self.catalog.get(equipment_id)?;
        let calculator = FinancingRangeCalculator::new(&self.settings);
        let (months, warning) = calculator.resolve_contract_months(contract_months, profile);
        let range = calculator.calculate(
            profile,
            months,
            profile.local_price(exchange_rate),
            insurance,
        );
        Some((range, warning))
    }

    /// 执行一次完整推导
    ///
    /// # 参数
    /// - input: 输入向量
    /// - rate: 本次使用的汇率 (兜底汇率会转为告警)
    /// - carried: 上一次推导携带的位置状态
    ///
    /// # 返回
    /// - Ok(QuoteOutcome): 快照 + 下一次推导应携带的状态
    /// - Err: 仅配置错误 (断点违反单调性等)
    #[instrument(skip(self, input, rate, carried), fields(
        equipment_id = %input.equipment_id,
        payment_mode = %input.payment_mode,
        service_tier = %input.service_tier
    ))]
    pub fn derive(
        &self,
        input: &QuoteInput,
        rate: &RateQuote,
        carried: Option<&PricingState>,
    ) -> EngineResult<QuoteOutcome> {
        let mut warnings = Vec::new();

        if let RateOrigin::Fallback { reason } = &rate.origin {
            warnings.push(QuoteWarning::ExternalSourceFailure {
                reason: reason.clone(),
                fallback_rate: rate.rate,
            });
        }

        let profile = match self.catalog.get(&input.equipment_id) {
            Some(profile) => profile,
            None => {
                warnings.push(QuoteWarning::UnknownEquipment {
                    equipment_id: input.equipment_id.clone(),
                });
                emit_warnings(&warnings);
                let snapshot = QuoteSnapshot::zeroed(
                    input.equipment_id.clone(),
                    rate.rate,
                    rate.origin.clone(),
                    warnings,
                );
                return Ok(QuoteOutcome {
                    snapshot,
                    state: None,
                });
            }
        };

        let snapshot = self.derive_for_profile(profile, input, rate, carried, warnings)?;
        let state = PricingState {
            equipment_id: profile.id.clone(),
            contract_months: snapshot.contract_months,
            position: snapshot.position,
        };

        info!(
            contract_months = snapshot.contract_months,
            position = %snapshot.position,
            financing_active = snapshot.financing.active,
            use_price_active = snapshot.credit.active,
            net_per_month = snapshot.net.per_month,
            warning_count = snapshot.warnings.len(),
            "报价推导完成"
        );

        Ok(QuoteOutcome {
            snapshot,
            state: Some(state),
        })
    }

    fn derive_for_profile(
        &self,
        profile: &EquipmentProfile,
        input: &QuoteInput,
        rate: &RateQuote,
        carried: Option<&PricingState>,
        mut warnings: Vec<QuoteWarning>,
    ) -> EngineResult<QuoteSnapshot> {
        let settings = &self.settings;

        // ===== 1. 输入夹取 =====
        let uses_per_day = clamp_input(
            "uses_per_day",
            input.uses_per_day,
            settings.max_uses_per_day,
            &mut warnings,
        );
        let price_per_use = clamp_input(
            "price_per_use",
            input.price_per_use.unwrap_or(profile.default_retail_price),
            settings.max_price_per_use,
            &mut warnings,
        );

        // ===== 2. 合同期限 + 融资区间 (含保费) =====
        let range_calculator = FinancingRangeCalculator::new(settings);
        let (contract_months, months_warning) =
            range_calculator.resolve_contract_months(input.contract_months, profile);
        warnings.extend(months_warning);

        let price_local = profile.local_price(rate.rate);
        let range = range_calculator.calculate(profile, contract_months, price_local, input.insurance);
        if range.is_degenerate() {
            warnings.push(QuoteWarning::DegenerateRange {
                value: range.band.min,
            });
        }

        // ===== 3. 投资位置 =====
        let initial = match carried {
            Some(state) if state.applies_to(&profile.id, contract_months) => state.position,
            Some(_) => {
                debug!(equipment_id = %profile.id, contract_months, "设备或期限已变化, 投资位置重置为标准档");
                PricingPosition::default()
            }
            None => PricingPosition::default(),
        };

        let mut resolver = PricingPositionResolver::new(profile, range.band, initial)?;
        match input.pricing_edit {
            PricingEdit::Keep => {}
            PricingEdit::Step(step) => {
                resolver.set_step(step);
            }
            PricingEdit::Position(value) => {
                resolver.set_position(value);
            }
            PricingEdit::FinancingCost(amount) => {
                resolver.set_financing_cost(amount);
            }
            PricingEdit::UsePrice(amount) => match resolver.set_use_price(amount) {
                Ok(_) => {}
                Err(EngineError::UsePriceNotBilled(_)) => {
                    warnings.push(QuoteWarning::UsePriceNotBilled { requested: amount });
                }
                Err(e) => return Err(e),
            },
        }

        let position = resolver.position();
        let financing = resolver.financing_quote();
        let credit = resolver.credit_quote();

        // ===== 4. 包月资格 =====
        let eligibility = self.flatrate.evaluate(&FlatrateRequest {
            uses_credits: profile.uses_credits,
            uses_per_day,
            financing_cost: financing.active,
            band: &range.band,
            payment_mode: input.payment_mode,
            allow_below_threshold: input.allow_flatrate_below_threshold,
        });
        let flatrate = FlatrateStatus {
            requested: input.flatrate_requested,
            eligible: eligibility.eligible,
            active: input.flatrate_requested && eligibility.eligible,
            threshold: eligibility.threshold,
            reasons: eligibility.reasons,
        };

        // ===== 5. 运营成本 =====
        let operating_cost = self.operating.calculate(&OperatingCostInput {
            profile,
            uses_per_day,
            use_price: credit.active,
            flatrate_active: flatrate.active,
            service_tier: input.service_tier,
            reference_financing: range.band.standard,
        });

        // ===== 6. 收入 =====
        let revenue = self.revenue.calculate(uses_per_day, price_per_use);

        // ===== 7. 净利润 =====
        let amortized_cost =
            self.net
                .amortized_cost(input.payment_mode, financing.active, price_local);
        let net = self.net.calculate(
            revenue.monthly.tax_exclusive,
            amortized_cost,
            operating_cost.total,
        );

        // ===== 8. 补充指标 =====
        let total_financing_over_contract = match input.payment_mode {
            PaymentMode::Financed => financing.active * contract_months as f64,
            PaymentMode::Cash => 0.0,
        };
        let monthly_margin_per_daily_use =
            settings.working_days_per_month * self.revenue.exclude_vat(price_per_use);
        let break_even_uses_per_day = if monthly_margin_per_daily_use > 0.0 {
            Some((amortized_cost + operating_cost.total) / monthly_margin_per_daily_use)
        } else {
            None
        };

        emit_warnings(&warnings);

        Ok(QuoteSnapshot {
            equipment_id: profile.id.clone(),
            payment_mode: input.payment_mode,
            service_tier: input.service_tier,
            contract_months,
            uses_per_day,
            price_per_use,
            exchange_rate: rate.rate,
            rate_origin: rate.origin.clone(),
            equipment_price_local: price_local,
            position,
            position_step: position.nearest_step(),
            insurance_premium: range.insurance_premium,
            financing,
            credit,
            flatrate,
            operating_cost,
            revenue,
            amortized_cost,
            net,
            total_financing_over_contract,
            break_even_uses_per_day,
            warnings,
        })
    }
}

/// 夹取输入到 [0, max], NaN 视为 0; 发生夹取时追加告警
fn clamp_input(field: &str, given: f64, max: f64, warnings: &mut Vec<QuoteWarning>) -> f64 {
    let clamped = if given.is_nan() {
        0.0
    } else {
        given.clamp(0.0, max.max(0.0))
    };

    if given.is_nan() || clamped != given {
        warnings.push(QuoteWarning::InputOutOfRange {
            field: field.to_string(),
            given,
            clamped,
        });
    }
    clamped
}

fn emit_warnings(warnings: &[QuoteWarning]) {
    for warning in warnings {
        warn!(warning = %warning, "报价告警");
    }
}

// ==========================================
// QuoteSession - 携带投资位置的会话
// ==========================================
// 唯一的跨推导状态; 设备或期限变化时由编排器重置为标准档
#[derive(Debug, Clone, Default)]
pub struct QuoteSession {
    state: Option<PricingState>,
}

impl QuoteSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<&PricingState> {
        self.state.as_ref()
    }

    /// 以最新输入重推导, 并更新携带的状态
    pub fn recompute(
        &mut self,
        orchestrator: &PricingOrchestrator,
        input: &QuoteInput,
        rate: &RateQuote,
    ) -> EngineResult<QuoteSnapshot> {
        let outcome = orchestrator.derive(input, rate, self.state.as_ref())?;
        self.state = outcome.state;
        Ok(outcome.snapshot)
    }

    pub fn reset(&mut self) {
        self.state = None;
    }
}
