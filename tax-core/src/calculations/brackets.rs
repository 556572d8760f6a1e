//! Bracket engine: marginal or flat taxation of taxable income.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{min, percent_of};
use crate::models::{BracketLine, TaxBracket, TaxSchedule};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketOutcome {
    pub lines: Vec<BracketLine>,
    pub total_tax: Decimal,
}

#[derive(Debug, Clone)]
pub struct BracketEngine<'a> {
    schedule: &'a TaxSchedule,
}

impl<'a> BracketEngine<'a> {
    pub fn new(schedule: &'a TaxSchedule) -> Self {
        Self { schedule }
    }

    /// Taxes `taxable_income` under the schedule.
    ///
    /// Progressive schedules emit one line per bracket that holds income;
    /// flat schedules always emit a single line, even for zero income.
    pub fn calculate(
        &self,
        taxable_income: Decimal,
    ) -> BracketOutcome {
        let lines = match self.schedule {
            TaxSchedule::Progressive { brackets } => self.progressive(brackets, taxable_income),
            TaxSchedule::Flat { rate } | TaxSchedule::FlatNoRelief { rate } => {
                vec![Self::flat(*rate, taxable_income)]
            }
        };
        let total_tax: Decimal = lines.iter().map(|l| l.tax_amount).sum();

        debug!(
            taxable = %taxable_income,
            lines = lines.len(),
            total_tax = %total_tax,
            "applied tax schedule"
        );

        BracketOutcome { lines, total_tax }
    }

    fn progressive(
        &self,
        brackets: &[TaxBracket],
        taxable_income: Decimal,
    ) -> Vec<BracketLine> {
        let mut lines = Vec::new();
        let mut lower_bound = Decimal::ZERO;

        for bracket in brackets {
            if taxable_income <= lower_bound {
                break;
            }
            let ceiling = bracket
                .upper_bound
                .map_or(taxable_income, |upper| min(taxable_income, upper));
            let taxable_amount = ceiling - lower_bound;

            if taxable_amount > Decimal::ZERO {
                lines.push(BracketLine {
                    rate: bracket.rate,
                    lower_bound,
                    upper_bound: bracket.upper_bound,
                    taxable_amount,
                    tax_amount: percent_of(taxable_amount, bracket.rate),
                });
            }

            match bracket.upper_bound {
                Some(upper) => lower_bound = upper,
                None => break,
            }
        }

        lines
    }

    fn flat(
        rate: Decimal,
        taxable_income: Decimal,
    ) -> BracketLine {
        BracketLine {
            rate,
            lower_bound: Decimal::ZERO,
            upper_bound: None,
            taxable_amount: taxable_income,
            tax_amount: percent_of(taxable_income, rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn annual_2025() -> TaxSchedule {
        TaxSchedule::Progressive {
            brackets: vec![
                TaxBracket::new(dec!(6), Some(dec!(1000000))),
                TaxBracket::new(dec!(18), Some(dec!(1500000))),
                TaxBracket::new(dec!(24), Some(dec!(2000000))),
                TaxBracket::new(dec!(30), Some(dec!(2500000))),
                TaxBracket::new(dec!(36), None),
            ],
        }
    }

    // =========================================================================
    // progressive
    // =========================================================================

    #[test]
    fn zero_income_has_no_lines() {
        let schedule = annual_2025();

        let outcome = BracketEngine::new(&schedule).calculate(Decimal::ZERO);

        assert!(outcome.lines.is_empty());
        assert_eq!(outcome.total_tax, Decimal::ZERO);
    }

    #[test]
    fn income_within_first_bracket() {
        let schedule = annual_2025();

        let outcome = BracketEngine::new(&schedule).calculate(dec!(400000));

        assert_eq!(
            outcome.lines,
            vec![BracketLine {
                rate: dec!(6),
                lower_bound: dec!(0),
                upper_bound: Some(dec!(1000000)),
                taxable_amount: dec!(400000),
                tax_amount: dec!(24000),
            }]
        );
        assert_eq!(outcome.total_tax, dec!(24000));
    }

    #[test]
    fn income_on_bracket_boundary_stops_there() {
        let schedule = annual_2025();

        let outcome = BracketEngine::new(&schedule).calculate(dec!(1500000));

        assert_eq!(outcome.lines.len(), 2);
        assert_eq!(outcome.total_tax, dec!(150000));
    }

    #[test]
    fn income_reaching_unbounded_bracket() {
        let schedule = annual_2025();

        let outcome = BracketEngine::new(&schedule).calculate(dec!(3000000));

        let taxed: Vec<_> = outcome
            .lines
            .iter()
            .map(|l| (l.rate, l.taxable_amount, l.tax_amount))
            .collect();
        assert_eq!(
            taxed,
            vec![
                (dec!(6), dec!(1000000), dec!(60000)),
                (dec!(18), dec!(500000), dec!(90000)),
                (dec!(24), dec!(500000), dec!(120000)),
                (dec!(30), dec!(500000), dec!(150000)),
                (dec!(36), dec!(500000), dec!(180000)),
            ]
        );
        assert_eq!(outcome.lines[4].upper_bound, None);
        assert_eq!(outcome.total_tax, dec!(600000));
    }

    #[test]
    fn line_amounts_sum_to_income() {
        let schedule = annual_2025();

        let outcome = BracketEngine::new(&schedule).calculate(dec!(2222222.22));

        let taxable: Decimal = outcome.lines.iter().map(|l| l.taxable_amount).sum();
        assert_eq!(taxable, dec!(2222222.22));
    }

    // =========================================================================
    // flat
    // =========================================================================

    #[test]
    fn flat_schedule_emits_single_line() {
        let schedule = TaxSchedule::FlatNoRelief { rate: dec!(45) };

        let outcome = BracketEngine::new(&schedule).calculate(dec!(1000000));

        assert_eq!(
            outcome.lines,
            vec![BracketLine {
                rate: dec!(45),
                lower_bound: dec!(0),
                upper_bound: None,
                taxable_amount: dec!(1000000),
                tax_amount: dec!(450000),
            }]
        );
        assert_eq!(outcome.total_tax, dec!(450000));
    }

    #[test]
    fn flat_schedule_emits_line_for_zero_income() {
        let schedule = TaxSchedule::Flat { rate: dec!(0) };

        let outcome = BracketEngine::new(&schedule).calculate(Decimal::ZERO);

        assert_eq!(outcome.lines.len(), 1);
        assert_eq!(outcome.total_tax, Decimal::ZERO);
    }
}
