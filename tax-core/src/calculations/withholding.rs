//! Withholding tax. Informational only; never feeds into total tax.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::percent_of;
use crate::models::{WithholdingOutcome, WithholdingRule};

#[derive(Debug, Clone)]
pub struct WithholdingCalculator<'a> {
    rule: Option<&'a WithholdingRule>,
}

impl<'a> WithholdingCalculator<'a> {
    pub fn new(rule: Option<&'a WithholdingRule>) -> Self {
        Self { rule }
    }

    /// `None` when the category carries no withholding rule.
    pub fn calculate(
        &self,
        gross: Decimal,
    ) -> Option<WithholdingOutcome> {
        let rule = self.rule?;
        let applicable = gross > rule.threshold;

        debug!(
            gross = %gross,
            threshold = %rule.threshold,
            applicable,
            "evaluated withholding"
        );

        Some(WithholdingOutcome {
            applicable,
            amount: applicable.then(|| percent_of(gross, rule.rate)),
            threshold: rule.threshold,
            rate: rule.rate,
        })
    }
}
