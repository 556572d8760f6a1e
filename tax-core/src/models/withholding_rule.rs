use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Withholding tax collected at source.
///
/// Withholding applies when the gross amount is strictly greater than
/// `threshold`; the withheld amount is `gross × rate / 100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingRule {
    /// Rate as a percentage.
    pub rate: Decimal,
    pub threshold: Decimal,
}
