use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IncomeCategory, Period, SubType};
use crate::error::TaxError;

/// Largest gross amount, relief, threshold or bracket bound the engine
/// accepts (LKR 10^15). Keeps every product in the pipeline well inside
/// `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// A single computation request, already lexically parsed.
///
/// Structural rules (sub-type family, required period, non-negative amount)
/// are checked by the resolver, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRequest {
    pub category: IncomeCategory,
    pub sub_type: Option<SubType>,
    pub period: Option<Period>,
    pub gross_amount: Decimal,
}

impl TaxRequest {
    pub fn new(
        category: IncomeCategory,
        gross_amount: Decimal,
    ) -> Self {
        Self {
            category,
            sub_type: None,
            period: None,
            gross_amount,
        }
    }

    pub fn with_sub_type(
        mut self,
        sub_type: SubType,
    ) -> Self {
        self.sub_type = Some(sub_type);
        self
    }

    pub fn with_period(
        mut self,
        period: Period,
    ) -> Self {
        self.period = Some(period);
        self
    }

    /// Builds a request from loose string selectors.
    ///
    /// Blank strings count as absent. An unknown sub-type name is reported as
    /// an unsupported combination for `category`.
    pub fn parse(
        category: &str,
        sub_type: Option<&str>,
        period: Option<&str>,
        gross_amount: Decimal,
    ) -> Result<Self, TaxError> {
        let category = IncomeCategory::parse(category)
            .ok_or_else(|| TaxError::InvalidCategory(category.trim().to_string()))?;

        let sub_type = match non_blank(sub_type) {
            Some(raw) => Some(SubType::parse(raw).ok_or_else(|| {
                TaxError::UnsupportedCombination {
                    category,
                    sub_type: raw.to_string(),
                }
            })?),
            None => None,
        };

        let period = match non_blank(period) {
            Some(raw) => {
                Some(Period::parse(raw).ok_or_else(|| TaxError::InvalidPeriod(raw.to_string()))?)
            }
            None => None,
        };

        Ok(Self {
            category,
            sub_type,
            period,
            gross_amount,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
