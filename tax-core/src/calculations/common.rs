//! Shared decimal helpers for the pipeline stages.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to two decimal places, midpoints away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}

/// `amount × rate / 100`, where `rate` is a percentage.
pub fn percent_of(
    amount: Decimal,
    rate: Decimal,
) -> Decimal {
    amount * rate / Decimal::ONE_HUNDRED
}
