//! Relief calculation: gross income to taxable income.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{max, min, percent_of};
use crate::models::{ReliefBreakdown, ReliefRule, TaxSchedule};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReliefOutcome {
    pub relief: ReliefBreakdown,
    pub taxable_income: Decimal,
}

/// Applies a (period-normalized) relief rule to a gross amount.
///
/// Relief is clamped so it never exceeds gross, keeping taxable income at or
/// above zero.
#[derive(Debug, Clone)]
pub struct ReliefCalculator<'a> {
    relief: &'a ReliefRule,
    schedule: &'a TaxSchedule,
}

impl<'a> ReliefCalculator<'a> {
    pub fn new(
        relief: &'a ReliefRule,
        schedule: &'a TaxSchedule,
    ) -> Self {
        Self { relief, schedule }
    }

    pub fn calculate(
        &self,
        gross: Decimal,
    ) -> ReliefOutcome {
        let relief = if matches!(self.schedule, TaxSchedule::FlatNoRelief { .. }) {
            ReliefBreakdown::default()
        } else {
            self.breakdown(gross)
        };
        let taxable_income = max(gross - relief.total(), Decimal::ZERO);

        debug!(
            gross = %gross,
            category_relief = %relief.category_relief,
            standard_relief = %relief.standard_relief,
            taxable = %taxable_income,
            "applied relief"
        );

        ReliefOutcome {
            relief,
            taxable_income,
        }
    }

    fn breakdown(
        &self,
        gross: Decimal,
    ) -> ReliefBreakdown {
        match self.relief {
            ReliefRule::Zero => ReliefBreakdown::default(),
            ReliefRule::Flat { amount } => ReliefBreakdown {
                category_relief: Decimal::ZERO,
                standard_relief: min(*amount, gross),
            },
            ReliefRule::PercentOfGross {
                rate,
                standard_amount,
            } => {
                let category_relief = min(percent_of(gross, *rate), gross);
                let remainder = gross - category_relief;
                let standard_relief = standard_amount
                    .map(|amount| min(amount, remainder))
                    .unwrap_or(Decimal::ZERO);
                ReliefBreakdown {
                    category_relief,
                    standard_relief,
                }
            }
            ReliefRule::Exempt { threshold } => {
                let exempt = threshold.is_none_or(|t| gross <= t);
                ReliefBreakdown {
                    category_relief: if exempt { gross } else { Decimal::ZERO },
                    standard_relief: Decimal::ZERO,
                }
            }
        }
    }
}
