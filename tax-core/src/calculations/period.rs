//! Period normalization: rescales a rule's amounts to the requested period.

use tracing::debug;

use crate::models::{CategoryRule, Period, ReliefRule, TaxSchedule, WithholdingRule};

/// Relief, schedule and withholding expressed in the requested period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRule {
    pub relief: ReliefRule,
    pub schedule: TaxSchedule,
    pub withholding: Option<WithholdingRule>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodNormalizer;

impl PeriodNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Converts `rule` from its basis period to `period`.
    ///
    /// With no period (a period-independent rule) or a period equal to the
    /// basis, the rule passes through untouched. Every currency amount is
    /// converted with the same ratio and without intermediate rounding.
    pub fn normalize(
        &self,
        rule: &CategoryRule,
        period: Option<Period>,
    ) -> NormalizedRule {
        let Some(period) = period.filter(|p| *p != rule.basis) else {
            return NormalizedRule {
                relief: rule.relief.clone(),
                schedule: rule.schedule.clone(),
                withholding: rule.withholding.clone(),
            };
        };

        debug!(
            rule = %rule.label(),
            from = %rule.basis,
            to = %period,
            "scaling rule to requested period"
        );

        let basis = rule.basis;
        NormalizedRule {
            relief: rule.relief.scaled(basis, period),
            schedule: rule.schedule.scaled(basis, period),
            withholding: rule.withholding.as_ref().map(|w| WithholdingRule {
                rate: w.rate,
                threshold: basis.convert(w.threshold, period),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{IncomeCategory, TaxBracket, TaxYearConfig};

    fn rule(category: IncomeCategory) -> CategoryRule {
        TaxYearConfig::y2025_26()
            .rule(category, None)
            .cloned()
            .unwrap()
    }

    #[test]
    fn annual_request_passes_through() {
        let employment = rule(IncomeCategory::Employment);

        let normalized = PeriodNormalizer::new().normalize(&employment, Some(Period::Annually));

        assert_eq!(normalized.relief, employment.relief);
        assert_eq!(normalized.schedule, employment.schedule);
    }

    #[test]
    fn monthly_request_divides_relief_and_bounds_by_twelve() {
        let employment = rule(IncomeCategory::Employment);

        let normalized = PeriodNormalizer::new().normalize(&employment, Some(Period::Monthly));

        assert_eq!(
            normalized.relief,
            ReliefRule::Flat {
                amount: dec!(150000)
            }
        );
        let TaxSchedule::Progressive { brackets } = normalized.schedule else {
            panic!("expected progressive schedule");
        };
        assert_eq!(brackets[1], TaxBracket::new(dec!(18), Some(dec!(125000))));
        assert_eq!(brackets[4], TaxBracket::new(dec!(36), None));
    }

    #[test]
    fn quarterly_request_scales_rental_relief_and_threshold() {
        let rental = rule(IncomeCategory::Rental);

        let normalized = PeriodNormalizer::new().normalize(&rental, Some(Period::Quarterly));

        assert_eq!(
            normalized.relief,
            ReliefRule::PercentOfGross {
                rate: dec!(25),
                standard_amount: Some(dec!(450000)),
            }
        );
        assert_eq!(
            normalized.withholding,
            Some(WithholdingRule {
                rate: dec!(10),
                threshold: dec!(300000),
            })
        );
    }

    #[test]
    fn period_independent_rule_is_untouched() {
        let interest = rule(IncomeCategory::Interest);

        let normalized = PeriodNormalizer::new().normalize(&interest, None);

        assert_eq!(
            normalized.withholding.map(|w| w.threshold),
            Some(dec!(1800000))
        );
    }
}
