use tracing::debug;

use crate::calculations::{
    BracketEngine, CategoryResolver, PeriodNormalizer, ReliefCalculator, ResultAssembler,
    WithholdingCalculator,
};
use crate::error::TaxError;
use crate::models::{TaxRequest, TaxResult, TaxYear, TaxYearConfig};

/// Tax engine for a single tax year.
///
/// Runs a request through resolver, normalizer, relief, brackets, withholding
/// and assembler. Holds no mutable state; one engine can serve any number of
/// threads.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::{IncomeCategory, Period, TaxEngine, TaxRequest, TaxYearConfig};
///
/// let engine = TaxEngine::new(TaxYearConfig::y2025_26());
/// let request = TaxRequest::new(IncomeCategory::Employment, dec!(300000))
///     .with_period(Period::Monthly);
///
/// let result = engine.compute(&request).unwrap();
///
/// assert_eq!(result.relief_amount(), dec!(150000));
/// assert_eq!(result.taxable_income, dec!(150000));
/// assert_eq!(result.total_tax.round_dp(2), dec!(18500));
/// ```
#[derive(Debug, Clone)]
pub struct TaxEngine {
    config: TaxYearConfig,
}

impl TaxEngine {
    pub fn new(config: TaxYearConfig) -> Self {
        Self { config }
    }

    pub fn tax_year(&self) -> TaxYear {
        self.config.tax_year()
    }

    pub fn config(&self) -> &TaxYearConfig {
        &self.config
    }

    /// Computes the tax for one request.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError`] when the request fails validation. Nothing is
    /// computed in that case.
    pub fn compute(
        &self,
        request: &TaxRequest,
    ) -> Result<TaxResult, TaxError> {
        let resolved = CategoryResolver::new(&self.config).resolve(request)?;
        let normalized = PeriodNormalizer::new().normalize(resolved.rule, resolved.period);

        let relief = ReliefCalculator::new(&normalized.relief, &normalized.schedule)
            .calculate(resolved.gross_amount);
        let brackets = BracketEngine::new(&normalized.schedule).calculate(relief.taxable_income);
        let withholding = WithholdingCalculator::new(normalized.withholding.as_ref())
            .calculate(resolved.gross_amount);

        debug!(rule = %resolved.rule.label(), "computation complete");

        Ok(ResultAssembler::new(self.config.tax_year()).assemble(
            &resolved,
            relief,
            brackets,
            withholding,
        ))
    }
}
