use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal-rate bracket.
///
/// `upper_bound` is cumulative: the bracket covers income from the previous
/// bracket's upper bound (or zero) up to this bound. `None` marks the final,
/// unbounded bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Marginal rate as a percentage, e.g. `18` for 18%.
    pub rate: Decimal,
    #[serde(default)]
    pub upper_bound: Option<Decimal>,
}

impl TaxBracket {
    pub fn new(
        rate: Decimal,
        upper_bound: Option<Decimal>,
    ) -> Self {
        Self { rate, upper_bound }
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper_bound.is_none()
    }
}
