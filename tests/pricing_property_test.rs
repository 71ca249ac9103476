// ==========================================
// 定价推导性质测试
// ==========================================
// 测试范围:
// 1. 位置全域扫描: 单调性 + 结尾约束
// 2. 融资轴逐单位编辑: 往返一致
// 3. 价格轴逐单位编辑: 往返一致
// 4. 会话往返: 每次编辑都经由携带位置重建解析器
// 5. 退化区间 / 非耗材设备
// ==========================================

#[allow(dead_code)]
mod helpers;

use equipment_quote::config::PricingSettings;
use equipment_quote::domain::{
    EquipmentProfile, FinancingBand, PricingEdit, PricingPosition, PricingStep, QuoteInput,
    QuoteSnapshot, RateQuote,
};
use equipment_quote::engine::{
    validate_record, EngineError, FinancingRangeCalculator, PricingOrchestrator,
    PricingPositionResolver, QuoteSession, RoundingPolicy,
};
use helpers::test_data_builder::{cryo, fixed, laser, orchestrator, TEST_RATE};

// ==========================================
// 测试辅助函数
// ==========================================

fn session_quote(
    session: &mut QuoteSession,
    orchestrator: &PricingOrchestrator,
    edit: PricingEdit,
) -> QuoteSnapshot {
    let mut input = QuoteInput::new("LASER-X");
    input.uses_per_day = 4.0;
    input.pricing_edit = edit;
    session
        .recompute(orchestrator, &input, &RateQuote::live(TEST_RATE))
        .unwrap()
}

fn band_for(profile: &EquipmentProfile, months: u32, insurance: bool) -> FinancingBand {
    let settings = PricingSettings::default();
    FinancingRangeCalculator::new(&settings)
        .calculate(profile, months, profile.local_price(TEST_RATE), insurance)
        .band
}

fn laser_resolver() -> (EquipmentProfile, FinancingBand, PricingPositionResolver) {
    let profile = validate_record(&laser()).unwrap();
    let band = band_for(&profile, 60, false);
    let resolver = PricingPositionResolver::new(&profile, band, PricingPosition::default()).unwrap();
    (profile, band, resolver)
}

// ==========================================
// 位置扫描
// ==========================================

#[test]
fn test_position_sweep_monotonic_and_compliant() {
    let (_, band, mut resolver) = laser_resolver();

    let mut prev_financing = f64::MIN;
    let mut prev_price = f64::MAX;

    for i in 0..=10_000 {
        let p = i as f64 / 10_000.0;
        resolver.set_position(p);
        let financing = resolver.financing_quote().active;
        let price = resolver.credit_quote().active;

        assert!(
            RoundingPolicy::is_financing_compliant(financing),
            "融资成本结尾违规: p={}, value={}",
            p,
            financing
        );
        assert!(
            RoundingPolicy::is_credit_compliant(price),
            "单次价格结尾违规: p={}, value={}",
            p,
            price
        );
        assert!(financing >= prev_financing, "融资成本非单调: p={}", p);
        assert!(price <= prev_price, "单次价格非单调: p={}", p);
        assert!(financing >= band.min && financing <= band.max);
        assert!((149.0..=199.0).contains(&price));

        prev_financing = financing;
        prev_price = price;
    }
}

#[test]
fn test_named_steps() {
    let (_, _, mut resolver) = laser_resolver();

    let expected = [
        (PricingStep::Min, 10_706.0, 199.0),
        (PricingStep::Low, 11_306.0, 189.0),
        (PricingStep::Standard, 11_906.0, 179.0),
        (PricingStep::High, 13_806.0, 169.0),
        (PricingStep::Max, 15_606.0, 149.0),
    ];

    for (step, financing, price) in expected {
        let position = resolver.set_step(step);
        assert_eq!(position.nearest_step(), step);
        assert_eq!(resolver.financing_quote().active, financing, "step={}", step);
        assert_eq!(resolver.credit_quote().active, price, "step={}", step);
    }
}

#[test]
fn test_out_of_domain_positions_clamped() {
    let (_, _, mut resolver) = laser_resolver();

    assert_eq!(resolver.set_position(-5.0).value(), 0.0);
    assert_eq!(resolver.financing_quote().active, 10_706.0);

    assert_eq!(resolver.set_position(7.0).value(), 1.0);
    assert_eq!(resolver.credit_quote().active, 149.0);
}

// ==========================================
// 往返一致性
// ==========================================

#[test]
fn test_financing_edit_round_trip_every_unit() {
    let (profile, band, mut resolver) = laser_resolver();

    let mut amount = band.min;
    while amount <= band.max {
        let position = resolver.set_financing_cost(amount);
        let financing = resolver.financing_quote();
        let credit = resolver.credit_quote();

        // 编辑值取整后即为报价
        assert_eq!(financing.active, RoundingPolicy::financing(amount), "amount={}", amount);

        // 同一位置重新推导得到同一组报价
        let replay = PricingPositionResolver::new(&profile, band, position).unwrap();
        assert_eq!(replay.financing_quote(), financing, "amount={}", amount);
        assert_eq!(replay.credit_quote(), credit, "amount={}", amount);

        // 回写当前值不移动位置
        assert_eq!(resolver.set_financing_cost(financing.active), position);

        amount += 1.0;
    }
}

#[test]
fn test_use_price_edit_round_trip_every_unit() {
    let (profile, band, mut resolver) = laser_resolver();

    for price in 149..=199 {
        let price = price as f64;
        let position = resolver.set_use_price(price).unwrap();
        let financing = resolver.financing_quote();
        let credit = resolver.credit_quote();

        assert_eq!(credit.active, RoundingPolicy::credit(price), "price={}", price);

        let replay = PricingPositionResolver::new(&profile, band, position).unwrap();
        assert_eq!(replay.financing_quote(), financing, "price={}", price);
        assert_eq!(replay.credit_quote(), credit, "price={}", price);

        assert_eq!(resolver.set_use_price(credit.active).unwrap(), position);
    }
}

#[test]
fn test_edits_outside_band_clamped() {
    let (_, band, mut resolver) = laser_resolver();

    resolver.set_financing_cost(1.0);
    assert_eq!(resolver.financing_quote().active, band.min);
    assert_eq!(resolver.position().value(), 0.0);

    resolver.set_financing_cost(1_000_000.0);
    assert_eq!(resolver.financing_quote().active, band.max);

    resolver.set_use_price(10_000.0).unwrap();
    assert_eq!(resolver.credit_quote().active, 199.0);
    assert_eq!(resolver.position().value(), 0.0);
}

// ==========================================
// 会话往返
// ==========================================

#[test]
fn test_session_financing_then_use_price_every_unit() {
    let orchestrator = orchestrator();
    let (_, band, _) = laser_resolver();

    let mut amount = band.min;
    while amount <= band.max {
        let mut session = QuoteSession::new();
        let s1 = session_quote(&mut session, &orchestrator, PricingEdit::FinancingCost(amount));
        assert_eq!(s1.financing.active, RoundingPolicy::financing(amount), "amount={}", amount);
        let price = s1.credit.active;

        // 同一会话回写当前单次价格: 位置与融资成本不变
        let s2 = session_quote(&mut session, &orchestrator, PricingEdit::UsePrice(price));
        assert_eq!(s2.position, s1.position, "amount={}", amount);
        assert_eq!(s2.financing, s1.financing, "amount={}", amount);
        assert_eq!(s2.credit.active, price, "amount={}", amount);

        // 新会话从标准档出发编辑同一价格: 反向路径得到同一价格
        let mut fresh = QuoteSession::new();
        let s3 = session_quote(&mut fresh, &orchestrator, PricingEdit::UsePrice(price));
        assert_eq!(s3.credit.active, price, "amount={}", amount);

        // 再以其融资成本开新会话: 价格不漂移
        let mut back = QuoteSession::new();
        let s4 = session_quote(
            &mut back,
            &orchestrator,
            PricingEdit::FinancingCost(s3.financing.active),
        );
        assert_eq!(s4.credit.active, price, "amount={}", amount);
        assert_eq!(s4.financing.active, s3.financing.active, "amount={}", amount);

        amount += 1.0;
    }
}

#[test]
fn test_session_use_price_edit_crosses_segment() {
    let orchestrator = orchestrator();
    let mut session = QuoteSession::new();

    let low = session_quote(&mut session, &orchestrator, PricingEdit::Step(PricingStep::Low));
    assert_eq!(low.position.value(), 0.25);
    assert_eq!(low.credit.active, 189.0);

    // 189 (MIN-STANDARD 区段) → 169 (STANDARD-MAX 区段)
    let s = session_quote(&mut session, &orchestrator, PricingEdit::UsePrice(169.0));
    assert!((s.position.value() - 2.0 / 3.0).abs() < 1e-9, "position={}", s.position);
    assert_eq!(s.credit.active, 169.0);
    assert_eq!(s.financing.active, 13_106.0);
    assert_eq!(s.position_step, PricingStep::High);

    // 回写融资成本不移动位置
    let again = session_quote(
        &mut session,
        &orchestrator,
        PricingEdit::FinancingCost(s.financing.active),
    );
    assert_eq!(again.position, s.position);
    assert_eq!(again.credit.active, 169.0);
}

#[test]
fn test_session_edit_one_lattice_step() {
    let orchestrator = orchestrator();

    // 标准档上调一个融资步长
    let mut session = QuoteSession::new();
    let up = session_quote(&mut session, &orchestrator, PricingEdit::FinancingCost(12_006.0));
    assert_eq!(up.financing.active, 12_006.0);
    assert_eq!(up.credit.active, 179.0);
    assert!(up.position.value() > 0.5);

    // 价格上调一个步长回到 LOW 档
    let s = session_quote(&mut session, &orchestrator, PricingEdit::UsePrice(189.0));
    assert_eq!(s.position.value(), 0.25);
    assert_eq!(s.financing.active, 11_306.0);
    assert_eq!(s.credit.active, 189.0);

    // 标准档下调一个融资步长
    let mut session = QuoteSession::new();
    let down = session_quote(&mut session, &orchestrator, PricingEdit::FinancingCost(11_806.0));
    assert_eq!(down.financing.active, 11_806.0);
    assert_eq!(down.credit.active, 179.0);
    assert!(down.position.value() < 0.5);
}

#[test]
fn test_session_financing_edit_rounds_hundred_first() {
    let orchestrator = orchestrator();

    for (amount, expected) in [(12_350.0, 12_406.0), (12_355.0, 12_406.0), (12_349.0, 12_306.0)] {
        let mut session = QuoteSession::new();
        let s = session_quote(&mut session, &orchestrator, PricingEdit::FinancingCost(amount));
        assert_eq!(s.financing.active, expected, "amount={}", amount);
    }
}

// ==========================================
// 区间计算
// ==========================================

#[test]
fn test_band_compliant_for_every_tariff() {
    let settings = PricingSettings::default();
    let laser = validate_record(&laser()).unwrap();
    let cryo = validate_record(&cryo()).unwrap();

    for profile in [&laser, &cryo] {
        for entry in settings.tariffs.entries() {
            for insurance in [false, true] {
                let band = band_for(profile, entry.contract_months, insurance);
                for value in [band.min, band.standard, band.max] {
                    assert!(
                        RoundingPolicy::is_financing_compliant(value),
                        "{} {}个月 保险={} 值={}",
                        profile.id,
                        entry.contract_months,
                        insurance,
                        value
                    );
                }
                assert!(band.min <= band.standard && band.standard <= band.max);
            }
        }
    }
}

#[test]
fn test_shorter_contract_costs_more() {
    let profile = validate_record(&laser()).unwrap();
    let short = band_for(&profile, 36, false);
    let long = band_for(&profile, 60, false);
    assert!(short.standard > long.standard);
    assert!(short.min > long.min);
}

// ==========================================
// 边界设备
// ==========================================

#[test]
fn test_degenerate_band_pins_standard() {
    let profile = validate_record(&fixed()).unwrap();
    let band = band_for(&profile, 60, false);
    assert_eq!(band.min, band.max);

    let mut resolver =
        PricingPositionResolver::new(&profile, band, PricingPosition::from_step(PricingStep::Max))
            .unwrap();
    assert!(resolver.is_collapsed());
    assert_eq!(resolver.position().nearest_step(), PricingStep::Standard);

    resolver.set_position(0.1);
    assert_eq!(resolver.position().value(), 0.5);
    resolver.set_financing_cost(band.min + 400.0);
    assert_eq!(resolver.financing_quote().active, band.min);
    resolver.set_use_price(150.0).unwrap();
    assert_eq!(resolver.credit_quote().active, 99.0);
}

#[test]
fn test_non_credit_equipment_has_no_use_price() {
    let profile = validate_record(&cryo()).unwrap();
    let band = band_for(&profile, 60, false);
    let mut resolver =
        PricingPositionResolver::new(&profile, band, PricingPosition::default()).unwrap();

    for i in 0..=100 {
        resolver.set_position(i as f64 / 100.0);
        assert_eq!(resolver.credit_quote().active, 0.0);
    }

    let before = resolver.position();
    assert!(matches!(
        resolver.set_use_price(150.0),
        Err(EngineError::UsePriceNotBilled(_))
    ));
    assert_eq!(resolver.position(), before);
}
