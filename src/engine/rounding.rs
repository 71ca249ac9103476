// ==========================================
// 设备成本报价系统 - 取整规则
// ==========================================
// 职责: 所有下游金额共用的确定性取整
// 红线: 纯函数、幂等; 融资成本以 6 结尾(百位格), 单次价格以 9 结尾(十位格)
// ==========================================

// ==========================================
// RoundingPolicy - 纯函数工具类
// ==========================================
pub struct RoundingPolicy;

impl RoundingPolicy {
    /// 融资成本: 格距 100, 末位 6 (如 12306)
    pub const FINANCING_BASE: f64 = 100.0;
    pub const FINANCING_DIGIT: f64 = 6.0;

    /// 单次价格: 格距 10, 末位 9 (如 149)
    pub const CREDIT_BASE: f64 = 10.0;
    pub const CREDIT_DIGIT: f64 = 9.0;

    /// 融资成本规则: 先取到最近的格距整倍数, 再把末位换成 digit
    ///
    /// # 规则
    /// 1. 金额先归一到分, 消除插值带来的浮点尾差
    /// 2. 四舍五入到最近的 base 整倍数 h
    /// 3. 结果为 h + digit; 非正数或非有限值返回 0
    ///
    /// # 性质
    /// - 幂等: f(f(x)) = f(x)
    /// - |f(x) - h| = digit <= base / 2
    /// - 单调不减
    ///
    /// # 示例
    /// - (12340, 6, 100) → 12306
    /// - (12350, 6, 100) → 12406
    /// - (12360, 6, 100) → 12406
    pub fn round_to_ending(value: f64, digit: f64, base: f64) -> f64 {
        if !value.is_finite() || value <= 0.0 {
            return 0.0;
        }
        (to_cents(value) / base).round() * base + digit
    }

    /// 单次价格规则: 先取整, 再取最近的 { k × base + digit } 格点(等距时向上)
    ///
    /// # 示例
    /// - (150, 9, 10) → 149
    /// - (155, 9, 10) → 159
    pub fn round_to_nearest_ending(value: f64, digit: f64, base: f64) -> f64 {
        if !value.is_finite() || value <= 0.0 {
            return 0.0;
        }
        let n = to_cents(value).round();
        let k = ((n - digit) / base).round().max(0.0);
        k * base + digit
    }

    /// 融资成本取整
    pub fn financing(value: f64) -> f64 {
        Self::round_to_ending(value, Self::FINANCING_DIGIT, Self::FINANCING_BASE)
    }

    /// 单次价格取整
    pub fn credit(value: f64) -> f64 {
        Self::round_to_nearest_ending(value, Self::CREDIT_DIGIT, Self::CREDIT_BASE)
    }

    /// 不低于 value 的最小合规单次价格
    pub fn credit_at_least(value: f64) -> f64 {
        let k = ((to_cents(value) - Self::CREDIT_DIGIT) / Self::CREDIT_BASE)
            .ceil()
            .max(0.0);
        k * Self::CREDIT_BASE + Self::CREDIT_DIGIT
    }

    /// 不高于 value 的最大合规单次价格 (可能为负, 表示不存在)
    pub fn credit_at_most(value: f64) -> f64 {
        let k = ((to_cents(value) - Self::CREDIT_DIGIT) / Self::CREDIT_BASE).floor();
        k * Self::CREDIT_BASE + Self::CREDIT_DIGIT
    }

    /// 是否满足融资成本结尾约束
    pub fn is_financing_compliant(value: f64) -> bool {
        Self::is_compliant(value, Self::FINANCING_DIGIT, Self::FINANCING_BASE)
    }

    /// 是否满足单次价格结尾约束
    pub fn is_credit_compliant(value: f64) -> bool {
        Self::is_compliant(value, Self::CREDIT_DIGIT, Self::CREDIT_BASE)
    }

    fn is_compliant(value: f64, digit: f64, base: f64) -> bool {
        value.is_finite() && value.fract() == 0.0 && (value - digit).rem_euclid(base) == 0.0
    }
}

/// 金额归一到分
fn to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_financing_examples() {
        assert_eq!(RoundingPolicy::financing(12340.0), 12306.0);
        assert_eq!(RoundingPolicy::financing(12360.0), 12406.0);
        assert_eq!(RoundingPolicy::financing(11892.0), 11906.0);
        assert_eq!(RoundingPolicy::financing(10736.0), 10706.0);
        assert_eq!(RoundingPolicy::financing(15600.0), 15606.0);
    }

    #[test]
    fn test_financing_rounds_hundred_before_digit() {
        // 余数落在 [50, 56) 时先进到下一个百位
        assert_eq!(RoundingPolicy::financing(12350.0), 12406.0);
        assert_eq!(RoundingPolicy::financing(12355.0), 12406.0);
        assert_eq!(RoundingPolicy::financing(12349.0), 12306.0);
        // 插值尾差不影响结果
        assert_eq!(RoundingPolicy::financing(12349.999_999_999), 12406.0);
        for k in 0..500 {
            let x = k as f64 * 100.0 + 50.0;
            assert_eq!(RoundingPolicy::financing(x), (x / 100.0).round() * 100.0 + 6.0);
        }
    }

    #[test]
    fn test_credit_examples() {
        assert_eq!(RoundingPolicy::credit(150.0), 149.0);
        assert_eq!(RoundingPolicy::credit(155.0), 159.0);
        assert_eq!(RoundingPolicy::credit(174.0), 179.0);
        assert_eq!(RoundingPolicy::credit(199.0), 199.0);
        assert_eq!(RoundingPolicy::credit(148.6), 149.0);
    }

    #[test]
    fn test_credit_inward_bounds() {
        assert_eq!(RoundingPolicy::credit_at_least(151.0), 159.0);
        assert_eq!(RoundingPolicy::credit_at_least(149.0), 149.0);
        assert_eq!(RoundingPolicy::credit_at_least(2.0), 9.0);
        assert_eq!(RoundingPolicy::credit_at_most(198.0), 189.0);
        assert_eq!(RoundingPolicy::credit_at_most(199.0), 199.0);
        assert!(RoundingPolicy::credit_at_most(5.0) < 0.0);
    }

    #[test]
    fn test_idempotent_and_bounded() {
        let mut x = 0.5;
        while x < 40_000.0 {
            let f = RoundingPolicy::financing(x);
            assert_eq!(RoundingPolicy::financing(f), f, "financing 不幂等: x={}", x);
            assert!(RoundingPolicy::is_financing_compliant(f));
            let hundred = f - RoundingPolicy::FINANCING_DIGIT;
            assert!((hundred - x).abs() <= RoundingPolicy::FINANCING_BASE / 2.0 + 0.01);

            let c = RoundingPolicy::credit(x);
            assert_eq!(RoundingPolicy::credit(c), c, "credit 不幂等: x={}", x);
            assert!(RoundingPolicy::is_credit_compliant(c));
            if x >= 9.0 {
                assert!((c - x).abs() <= RoundingPolicy::CREDIT_BASE / 2.0 + 0.51);
            }

            x += 0.7;
        }
    }

    #[test]
    fn test_monotonic() {
        let mut prev_f = 0.0;
        let mut prev_c = 0.0;
        let mut x = 0.0;
        while x < 5_000.0 {
            let f = RoundingPolicy::financing(x);
            let c = RoundingPolicy::credit(x);
            assert!(f >= prev_f);
            assert!(c >= prev_c);
            prev_f = f;
            prev_c = c;
            x += 0.3;
        }
    }

    #[test]
    fn test_zero_and_invalid_values_round_to_zero() {
        assert_eq!(RoundingPolicy::financing(0.0), 0.0);
        assert_eq!(RoundingPolicy::financing(-40.0), 0.0);
        assert_eq!(RoundingPolicy::financing(f64::NAN), 0.0);
        assert_eq!(RoundingPolicy::credit(0.0), 0.0);
        assert_eq!(RoundingPolicy::credit(f64::NAN), 0.0);
        assert!(!RoundingPolicy::is_credit_compliant(150.0));
        assert!(RoundingPolicy::is_financing_compliant(11906.0));
    }
}
