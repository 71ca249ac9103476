// ==========================================
// QuoteApi 集成测试
// ==========================================
// 测试范围:
// 1. AppState 组装 (临时数据库 + 固定汇率源)
// 2. 报价 / 设备列表 / 融资区间查询
// 3. 汇率源失败时的兜底
// 4. 目录重新加载
// ==========================================

#[allow(dead_code)]
mod helpers;
mod test_helpers;

use async_trait::async_trait;
use equipment_quote::api::ApiError;
use equipment_quote::app::AppState;
use equipment_quote::domain::{PricingEdit, PricingStep, QuoteInput, QuoteWarning, RateOrigin};
use equipment_quote::rates::{ExchangeRateSource, RateError, RateResult, StaticRateSource};
use helpers::test_data_builder::{cryo, fixed, laser, TEST_RATE};
use std::sync::Arc;
use tempfile::NamedTempFile;

struct DownSource;

#[async_trait]
impl ExchangeRateSource for DownSource {
    async fn get_rate(&self, _from: &str, _to: &str) -> RateResult<f64> {
        Err(RateError::Unavailable("connection refused".to_string()))
    }
}

async fn seeded_state(source: Arc<dyn ExchangeRateSource>) -> (NamedTempFile, AppState) {
    let (temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let state = AppState::with_rate_source(db_path, source).await.unwrap();

    state
        .equipment_repo
        .upsert_batch(&[laser(), cryo(), fixed()])
        .unwrap();
    assert_eq!(state.quote_api.reload_catalog().unwrap(), 3);

    (temp_file, state)
}

fn laser_input() -> QuoteInput {
    let mut input = QuoteInput::new("LASER-X");
    input.uses_per_day = 4.0;
    input.price_per_use = Some(2_500.0);
    input
}

#[tokio::test]
async fn test_空库启动() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let state = AppState::with_rate_source(db_path, Arc::new(StaticRateSource::new(TEST_RATE)))
        .await
        .unwrap();

    assert!(state.quote_api.list_equipment().unwrap().is_empty());
    assert_eq!(state.settings.vat_rate, 0.25);

    let outcome = state
        .quote_api
        .quote(&QuoteInput::new("LASER-X"), None)
        .await
        .unwrap();
    assert!(outcome.state.is_none());
    assert_eq!(outcome.snapshot.net.per_month, 0.0);
}

#[tokio::test]
async fn test_报价与汇率缓存() {
    let (_temp_file, state) = seeded_state(Arc::new(StaticRateSource::new(TEST_RATE))).await;
    let api = &state.quote_api;

    let first = api.quote(&laser_input(), None).await.unwrap();
    assert_eq!(first.snapshot.rate_origin, RateOrigin::Live);
    assert_eq!(first.snapshot.financing.active, 11_906.0);
    assert_eq!(first.snapshot.revenue.monthly.tax_exclusive, 176_000.0);

    // 携带状态 + 编辑档位
    let mut input = laser_input();
    input.pricing_edit = PricingEdit::Step(PricingStep::Max);
    let second = api.quote(&input, first.state.as_ref()).await.unwrap();
    assert_eq!(second.snapshot.rate_origin, RateOrigin::Cached);
    assert_eq!(second.snapshot.financing.active, 15_606.0);
    assert_eq!(second.snapshot.credit.active, 149.0);

    input.pricing_edit = PricingEdit::Keep;
    let third = api.quote(&input, second.state.as_ref()).await.unwrap();
    assert_eq!(third.snapshot.position_step, PricingStep::Max);
}

#[tokio::test]
async fn test_汇率源失败使用兜底() {
    let (_temp_file, state) = seeded_state(Arc::new(DownSource)).await;

    let outcome = state.quote_api.quote(&laser_input(), None).await.unwrap();
    let s = outcome.snapshot;

    assert_eq!(s.exchange_rate, 11.4926);
    assert!(matches!(s.rate_origin, RateOrigin::Fallback { .. }));
    assert!(s
        .warnings
        .iter()
        .any(|w| matches!(w, QuoteWarning::ExternalSourceFailure { fallback_rate, .. } if *fallback_rate == 11.4926)));

    // 推导照常完成
    assert_eq!(s.financing.active, 11_906.0);

    // 兜底不缓存, 下一次仍是兜底 (而不是 Cached)
    let again = state.quote_api.current_rate().await;
    assert!(again.is_fallback());
}

#[tokio::test]
async fn test_设备列表() {
    let (_temp_file, state) = seeded_state(Arc::new(StaticRateSource::new(TEST_RATE))).await;

    let items = state.quote_api.list_equipment().unwrap();
    let ids: Vec<&str> = items.iter().map(|i| i.equipment_id.as_str()).collect();
    assert_eq!(ids, vec!["CRYO-1", "FIXED-1", "LASER-X"]);

    let laser = items.iter().find(|i| i.equipment_id == "LASER-X").unwrap();
    assert!(laser.uses_credits);
    assert!(laser.has_explicit_band);
    assert_eq!(laser.default_contract_months, Some(60));

    let cryo = items.iter().find(|i| i.equipment_id == "CRYO-1").unwrap();
    assert!(!cryo.has_explicit_band);
}

#[tokio::test]
async fn test_融资区间查询() {
    let (_temp_file, state) = seeded_state(Arc::new(StaticRateSource::new(TEST_RATE))).await;
    let api = &state.quote_api;

    let view = api.financing_band("LASER-X", Some(60), false).await.unwrap();
    assert_eq!((view.min, view.standard, view.max), (10_706.0, 11_906.0, 15_606.0));
    assert_eq!(view.insurance_premium, 0.0);
    assert_eq!(view.exchange_rate, TEST_RATE);
    assert!(view.warnings.is_empty());

    let view = api.financing_band("LASER-X", Some(30), true).await.unwrap();
    assert_eq!(view.contract_months, 60);
    assert!(view.insurance_premium > 0.0);
    assert!(view.warnings.contains(&QuoteWarning::UnknownContractLength {
        requested: 30,
        used: 60,
    }));

    let view = api.financing_band("FIXED-1", None, false).await.unwrap();
    assert!(view
        .warnings
        .contains(&QuoteWarning::DegenerateRange { value: 5_006.0 }));

    assert!(matches!(
        api.financing_band("GHOST", None, false).await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_删除设备后重新加载() {
    let (_temp_file, state) = seeded_state(Arc::new(StaticRateSource::new(TEST_RATE))).await;

    state.equipment_repo.delete("FIXED-1").unwrap();
    assert_eq!(state.quote_api.reload_catalog().unwrap(), 2);

    let mut input = QuoteInput::new("FIXED-1");
    input.uses_per_day = 3.0;
    let outcome = state.quote_api.quote(&input, None).await.unwrap();
    assert_eq!(
        outcome.snapshot.warnings,
        vec![QuoteWarning::UnknownEquipment {
            equipment_id: "FIXED-1".to_string()
        }]
    );
}
