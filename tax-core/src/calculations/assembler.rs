//! Result assembly.

use tracing::debug;

use crate::calculations::brackets::BracketOutcome;
use crate::calculations::relief::ReliefOutcome;
use crate::calculations::resolver::ResolvedRequest;
use crate::models::{TaxResult, TaxYear, WithholdingOutcome};

#[derive(Debug, Clone, Copy)]
pub struct ResultAssembler {
    tax_year: TaxYear,
}

impl ResultAssembler {
    pub fn new(tax_year: TaxYear) -> Self {
        Self { tax_year }
    }

    pub fn assemble(
        &self,
        resolved: &ResolvedRequest<'_>,
        relief: ReliefOutcome,
        brackets: BracketOutcome,
        withholding: Option<WithholdingOutcome>,
    ) -> TaxResult {
        let result = TaxResult {
            tax_year: self.tax_year,
            category: resolved.rule.category,
            sub_type: resolved.rule.sub_type,
            period: resolved.period,
            gross_income: resolved.gross_amount,
            relief: relief.relief,
            taxable_income: relief.taxable_income,
            brackets: brackets.lines,
            total_tax: brackets.total_tax,
            withholding,
        };

        debug!(
            tax_year = %result.tax_year,
            category = %result.category,
            total_tax = %result.total_tax,
            "assembled tax result"
        );

        result
    }
}
