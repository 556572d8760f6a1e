use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{IncomeCategory, SubType};

/// Validation errors raised before any computation begins.
///
/// Every variant describes a problem with the request itself, so none of
/// them are worth retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaxError {
    #[error("invalid income category '{0}'")]
    InvalidCategory(String),

    #[error("invalid period '{0}'; expected monthly, quarterly or annually")]
    InvalidPeriod(String),

    #[error("{0} income requires a sub-type ({expected})", expected = .0.sub_type_names().join(" or "))]
    MissingSubType(IncomeCategory),

    #[error("{0} income requires a period (monthly, quarterly or annually)")]
    MissingPeriod(IncomeCategory),

    #[error("invalid amount '{0}'; expected a non-negative number")]
    InvalidAmount(String),

    #[error("amount '{0}' exceeds the maximum of 1,000,000,000,000,000")]
    AmountTooLarge(String),

    #[error("sub-type '{sub_type}' is not valid for {category} income")]
    UnsupportedCombination {
        category: IncomeCategory,
        sub_type: String,
    },

    #[error("tax year '{0}' is not supported")]
    UnsupportedTaxYear(String),

    #[error("no tax rule configured for {category}{}", .sub_type.map(|s| format!("/{s}")).unwrap_or_default())]
    MissingRule {
        category: IncomeCategory,
        sub_type: Option<SubType>,
    },
}

impl TaxError {
    /// Convenience constructor for a negative amount.
    pub fn negative_amount(amount: Decimal) -> Self {
        TaxError::InvalidAmount(amount.to_string())
    }
}

/// Errors found while validating a tax-year rule table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0}: bracket schedule is empty")]
    EmptySchedule(String),

    #[error("{rule}: bracket rate {rate} is outside 0..=100")]
    RateOutOfRange { rule: String, rate: Decimal },

    #[error("{rule}: bracket upper bound {bound} does not exceed the previous bound {previous}")]
    NonIncreasingBound {
        rule: String,
        bound: Decimal,
        previous: Decimal,
    },

    #[error("{0}: only the final bracket may be unbounded")]
    UnboundedBeforeLast(String),

    #[error("{0}: final bracket must be unbounded")]
    BoundedFinalBracket(String),

    #[error("{rule}: {field} must be non-negative, got {value}")]
    NegativeAmount {
        rule: String,
        field: &'static str,
        value: Decimal,
    },

    #[error("{rule}: {field} {value} exceeds the maximum amount")]
    AmountTooLarge {
        rule: String,
        field: &'static str,
        value: Decimal,
    },

    #[error("{rule}: period_dependent must be {expected} for this category")]
    PeriodDependenceMismatch { rule: String, expected: bool },

    #[error("{0}: brackets can only replace a progressive schedule")]
    NotProgressive(String),

    #[error("{0}: sub-type does not belong to the category")]
    SubTypeMismatch(String),

    #[error("{0}: duplicate rule")]
    DuplicateRule(String),

    #[error("invalid tax year label '{0}'")]
    InvalidTaxYear(String),
}
