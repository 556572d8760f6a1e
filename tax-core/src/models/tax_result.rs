use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{IncomeCategory, Period, SubType, TaxYear};

/// One row of the bracket breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketLine {
    /// Rate as a percentage.
    pub rate: Decimal,
    pub lower_bound: Decimal,
    /// `None` for the final (or a flat) bracket.
    pub upper_bound: Option<Decimal>,
    pub taxable_amount: Decimal,
    pub tax_amount: Decimal,
}

impl BracketLine {
    /// Bracket width, `None` when unbounded.
    pub fn width(&self) -> Option<Decimal> {
        self.upper_bound.map(|u| u - self.lower_bound)
    }
}

/// Relief split into its category-specific part and the standard part.
///
/// For rental income `category_relief` is the percentage-of-gross relief and
/// `standard_relief` the personal relief taken from what remains. For an
/// exempt category the whole gross is `category_relief`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliefBreakdown {
    pub category_relief: Decimal,
    pub standard_relief: Decimal,
}

impl ReliefBreakdown {
    pub fn total(&self) -> Decimal {
        self.category_relief + self.standard_relief
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingOutcome {
    pub applicable: bool,
    /// Present only when applicable.
    pub amount: Option<Decimal>,
    pub threshold: Decimal,
    pub rate: Decimal,
}

/// Gross income and total tax scaled up to a full year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualEquivalent {
    pub gross_income: Decimal,
    pub total_tax: Decimal,
}

/// Complete, exact outcome of one computation.
///
/// Amounts keep full decimal precision; rounding happens only when the
/// result is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub tax_year: TaxYear,
    pub category: IncomeCategory,
    pub sub_type: Option<SubType>,
    /// `None` for period-independent categories.
    pub period: Option<Period>,
    pub gross_income: Decimal,
    pub relief: ReliefBreakdown,
    pub taxable_income: Decimal,
    pub brackets: Vec<BracketLine>,
    pub total_tax: Decimal,
    pub withholding: Option<WithholdingOutcome>,
}

impl TaxResult {
    pub fn relief_amount(&self) -> Decimal {
        self.relief.total()
    }

    /// Total tax as a percentage of gross income; zero for zero gross.
    pub fn effective_rate(&self) -> Decimal {
        if self.gross_income.is_zero() {
            return Decimal::ZERO;
        }
        self.total_tax / self.gross_income * Decimal::ONE_HUNDRED
    }

    pub fn annual_equivalent(&self) -> AnnualEquivalent {
        let multiplier = Decimal::from(self.period.unwrap_or_default().periods_per_year());
        AnnualEquivalent {
            gross_income: self.gross_income * multiplier,
            total_tax: self.total_tax * multiplier,
        }
    }
}
