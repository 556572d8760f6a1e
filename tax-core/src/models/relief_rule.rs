use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Period;

/// How much of the gross amount is relieved before taxation.
///
/// Amounts are expressed in the owning rule's basis period and are scaled by
/// the period normalizer before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReliefRule {
    /// No relief; the whole gross amount is taxable.
    Zero,

    /// A fixed personal relief per period.
    Flat { amount: Decimal },

    /// A percentage of gross (e.g. the 25% rental relief), optionally followed
    /// by a flat standard relief taken from what remains.
    PercentOfGross {
        rate: Decimal,
        #[serde(default)]
        standard_amount: Option<Decimal>,
    },

    /// Full exemption. With a threshold, only amounts at or below it are
    /// exempt; larger amounts get no relief at all.
    Exempt {
        #[serde(default)]
        threshold: Option<Decimal>,
    },
}

impl ReliefRule {
    /// Returns a copy with every currency amount converted from `from` to `to`.
    /// Percentages are left alone.
    pub fn scaled(
        &self,
        from: Period,
        to: Period,
    ) -> Self {
        let scale = |amount: Decimal| from.convert(amount, to);
        match self {
            Self::Zero => Self::Zero,
            Self::Flat { amount } => Self::Flat {
                amount: scale(*amount),
            },
            Self::PercentOfGross {
                rate,
                standard_amount,
            } => Self::PercentOfGross {
                rate: *rate,
                standard_amount: standard_amount.map(scale),
            },
            Self::Exempt { threshold } => Self::Exempt {
                threshold: threshold.map(scale),
            },
        }
    }
}
