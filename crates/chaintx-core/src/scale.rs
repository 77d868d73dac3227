//! Raw integer amounts → human-scale decimals.

use alloy_primitives::U256;
use bigdecimal::num_bigint::{BigInt, Sign};
use bigdecimal::{BigDecimal, RoundingMode};
use std::num::NonZeroU64;

/// Precision and rounding applied to a scaled amount.
///
/// `precision` counts significant digits; `None` keeps the exact quotient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalePolicy {
    pub precision: Option<NonZeroU64>,
    pub rounding: RoundingMode,
}

impl Default for ScalePolicy {
    fn default() -> Self {
        Self::exact()
    }
}

impl ScalePolicy {
    /// Keep every digit.
    pub const fn exact() -> Self {
        Self {
            precision: None,
            rounding: RoundingMode::HalfUp,
        }
    }

    /// Round to `digits` significant digits; `0` means exact.
    pub fn significant(digits: u64, rounding: RoundingMode) -> Self {
        Self {
            precision: NonZeroU64::new(digits),
            rounding,
        }
    }

    pub fn apply(&self, value: BigDecimal) -> BigDecimal {
        match self.precision {
            Some(prec) => value.with_precision_round(prec, self.rounding),
            None => value,
        }
    }
}

/// Parse a rounding mode name such as `half_up` or `HALF_EVEN`.
pub fn parse_rounding(name: &str) -> Option<RoundingMode> {
    let mode = match name.to_ascii_lowercase().replace('-', "_").as_str() {
        "up" => RoundingMode::Up,
        "down" => RoundingMode::Down,
        "ceiling" => RoundingMode::Ceiling,
        "floor" => RoundingMode::Floor,
        "half_up" => RoundingMode::HalfUp,
        "half_down" => RoundingMode::HalfDown,
        "half_even" => RoundingMode::HalfEven,
        _ => return None,
    };
    Some(mode)
}

/// Exact conversion of a raw amount to `BigDecimal`.
pub fn to_decimal(raw: U256) -> BigDecimal {
    BigDecimal::new(to_bigint(raw), 0)
}

/// `raw / 10^decimals`, computed exactly and then shaped by `policy`.
pub fn scale(raw: U256, decimals: u32, policy: &ScalePolicy) -> BigDecimal {
    policy.apply(BigDecimal::new(to_bigint(raw), i64::from(decimals)))
}

fn to_bigint(raw: U256) -> BigInt {
    BigInt::from_bytes_be(Sign::Plus, &raw.to_be_bytes::<32>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn six_decimals() {
        let v = scale(U256::from(1_500_000u64), 6, &ScalePolicy::exact());
        assert_eq!(v, dec("1.5"));
    }

    #[test]
    fn zero_decimals_is_identity() {
        let raw = U256::from(123_456_789u64);
        assert_eq!(scale(raw, 0, &ScalePolicy::exact()), dec("123456789"));
        assert_eq!(scale(raw, 0, &ScalePolicy::exact()), to_decimal(raw));
    }

    #[test]
    fn one_ether() {
        let wei = U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(scale(wei, 18, &ScalePolicy::exact()), dec("1"));
    }

    #[test]
    fn max_u256_is_exact() {
        let v = scale(U256::MAX, 18, &ScalePolicy::exact());
        assert_eq!(
            v,
            dec("115792089237316195423570985008687907853269984665640564039457.584007913129639935")
        );
    }

    #[test]
    fn precision_rounds_significant_digits() {
        let policy = ScalePolicy::significant(3, RoundingMode::HalfUp);
        // 1.23456789 → 1.23
        let v = scale(U256::from(123_456_789u64), 8, &policy);
        assert_eq!(v, dec("1.23"));

        let policy = ScalePolicy::significant(2, RoundingMode::Down);
        let v = scale(U256::from(199u64), 2, &policy);
        assert_eq!(v, dec("1.9"));
    }

    #[test]
    fn zero_precision_means_exact() {
        let policy = ScalePolicy::significant(0, RoundingMode::Floor);
        assert_eq!(policy, ScalePolicy { precision: None, rounding: RoundingMode::Floor });
        assert_eq!(scale(U256::from(7u8), 3, &policy), dec("0.007"));
    }

    #[test]
    fn rounding_names() {
        assert_eq!(parse_rounding("HALF_EVEN"), Some(RoundingMode::HalfEven));
        assert_eq!(parse_rounding("half-up"), Some(RoundingMode::HalfUp));
        assert_eq!(parse_rounding("nearest"), None);
    }
}
