//! Category resolution: validates a request and selects its rule.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::TaxError;
use crate::models::{CategoryRule, MAX_AMOUNT, Period, TaxRequest, TaxYearConfig};

/// A request that passed validation, paired with the rule that governs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest<'a> {
    pub rule: &'a CategoryRule,
    /// Always `None` for period-independent rules.
    pub period: Option<Period>,
    pub gross_amount: Decimal,
}

#[derive(Debug, Clone)]
pub struct CategoryResolver<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> CategoryResolver<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// Validates `request` and looks up its rule.
    ///
    /// # Errors
    ///
    /// - [`TaxError::InvalidAmount`] for a negative amount
    /// - [`TaxError::AmountTooLarge`] above [`MAX_AMOUNT`]
    /// - [`TaxError::MissingSubType`] when the category needs a sub-type
    /// - [`TaxError::UnsupportedCombination`] for a sub-type outside the category's family
    /// - [`TaxError::MissingPeriod`] when a period-dependent category has none
    /// - [`TaxError::MissingRule`] when the tax year has no matching rule
    pub fn resolve(
        &self,
        request: &TaxRequest,
    ) -> Result<ResolvedRequest<'a>, TaxError> {
        if request.gross_amount < Decimal::ZERO {
            return Err(TaxError::negative_amount(request.gross_amount));
        }
        if request.gross_amount > MAX_AMOUNT {
            return Err(TaxError::AmountTooLarge(request.gross_amount.to_string()));
        }

        self.check_sub_type(request)?;

        let rule = self
            .config
            .rule(request.category, request.sub_type)
            .ok_or(TaxError::MissingRule {
                category: request.category,
                sub_type: request.sub_type,
            })?;

        let period = self.period(rule, request)?;

        debug!(
            rule = %rule.label(),
            period = ?period,
            gross = %request.gross_amount,
            tax_year = %self.config.tax_year(),
            "resolved category rule"
        );

        Ok(ResolvedRequest {
            rule,
            period,
            gross_amount: request.gross_amount,
        })
    }

    fn check_sub_type(
        &self,
        request: &TaxRequest,
    ) -> Result<(), TaxError> {
        let category = request.category;
        match request.sub_type {
            None if category.requires_sub_type() => Err(TaxError::MissingSubType(category)),
            Some(sub_type) if sub_type.category() != category => {
                Err(TaxError::UnsupportedCombination {
                    category,
                    sub_type: sub_type.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Period-independent rules drop whatever period was supplied.
    fn period(
        &self,
        rule: &CategoryRule,
        request: &TaxRequest,
    ) -> Result<Option<Period>, TaxError> {
        if !rule.period_dependent {
            return Ok(None);
        }
        request
            .period
            .map(Some)
            .ok_or(TaxError::MissingPeriod(request.category))
    }
}
