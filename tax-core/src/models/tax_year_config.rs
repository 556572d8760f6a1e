use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{
    CategoryRule, IncomeCategory, MAX_AMOUNT, Period, ReliefRule, SubType, TaxBracket,
    TaxSchedule, TaxYear, WithholdingRule,
};
use crate::error::ConfigError;

/// Complete, validated rule table for one tax year.
///
/// Construction always validates, so an engine built from a `TaxYearConfig`
/// never meets a malformed schedule at request time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTaxYearConfig")]
pub struct TaxYearConfig {
    tax_year: TaxYear,
    rules: Vec<CategoryRule>,
}

#[derive(Deserialize)]
struct RawTaxYearConfig {
    tax_year: TaxYear,
    rules: Vec<CategoryRule>,
}

impl TryFrom<RawTaxYearConfig> for TaxYearConfig {
    type Error = ConfigError;

    fn try_from(raw: RawTaxYearConfig) -> Result<Self, Self::Error> {
        TaxYearConfig::new(raw.tax_year, raw.rules)
    }
}

impl TaxYearConfig {
    /// Validates `rules` and builds the config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - a progressive schedule is empty, has non-increasing bounds, or is not
    ///   closed by exactly one unbounded bracket
    /// - any rate is outside `0..=100`
    /// - any relief, threshold or bound is negative or above [`MAX_AMOUNT`]
    /// - a sub-type does not belong to its category
    /// - `period_dependent` disagrees with the category
    /// - two rules cover the same (category, sub-type)
    pub fn new(
        tax_year: TaxYear,
        rules: Vec<CategoryRule>,
    ) -> Result<Self, ConfigError> {
        for (i, rule) in rules.iter().enumerate() {
            validate_rule(rule)?;
            if rules[..i]
                .iter()
                .any(|r| r.matches(rule.category, rule.sub_type))
            {
                return Err(ConfigError::DuplicateRule(rule.label()));
            }
        }
        Ok(Self { tax_year, rules })
    }

    pub fn tax_year(&self) -> TaxYear {
        self.tax_year
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Looks up the rule for an exact (category, sub-type) pair.
    pub fn rule(
        &self,
        category: IncomeCategory,
        sub_type: Option<SubType>,
    ) -> Option<&CategoryRule> {
        self.rules.iter().find(|r| r.matches(category, sub_type))
    }

    /// Replaces the brackets of a progressive rule, keeping everything else.
    ///
    /// Used when a bracket schedule is supplied separately from the rule set.
    /// A missing rule is left alone.
    ///
    /// # Errors
    /// [`ConfigError::NotProgressive`] when the rule has a flat schedule, or
    /// any bracket validation error for the replacement.
    pub fn with_brackets(
        mut self,
        category: IncomeCategory,
        sub_type: Option<SubType>,
        brackets: Vec<TaxBracket>,
    ) -> Result<Self, ConfigError> {
        if let Some(rule) = self
            .rules
            .iter_mut()
            .find(|r| r.matches(category, sub_type))
        {
            if rule.schedule.is_flat() {
                return Err(ConfigError::NotProgressive(rule.label()));
            }
            rule.schedule = TaxSchedule::Progressive { brackets };
            validate_rule(rule)?;
        }
        Ok(self)
    }

    /// Built-in table for the 2024/2025 year of assessment.
    pub fn y2024_25() -> Self {
        let standard = standard_brackets(
            &[dec!(500000), dec!(500000), dec!(500000), dec!(500000), dec!(500000)],
            &[dec!(6), dec!(12), dec!(18), dec!(24), dec!(30)],
            dec!(36),
        );
        Self::built_in(
            TaxYear(2024),
            BuiltInRates {
                personal_relief: dec!(1200000),
                standard,
                special_business_rate: dec!(40),
                dividend_rate: dec!(14),
                interest_rate: dec!(14),
                capital_gains_rate: dec!(10),
            },
        )
    }

    /// Built-in table for the 2025/2026 year of assessment.
    pub fn y2025_26() -> Self {
        let standard = standard_brackets(
            &[dec!(1000000), dec!(500000), dec!(500000), dec!(500000)],
            &[dec!(6), dec!(18), dec!(24), dec!(30)],
            dec!(36),
        );
        Self::built_in(
            TaxYear(2025),
            BuiltInRates {
                personal_relief: dec!(1800000),
                standard,
                special_business_rate: dec!(45),
                dividend_rate: dec!(15),
                interest_rate: dec!(10),
                capital_gains_rate: dec!(15),
            },
        )
    }

    fn built_in(
        tax_year: TaxYear,
        rates: BuiltInRates,
    ) -> Self {
        let personal = ReliefRule::Flat {
            amount: rates.personal_relief,
        };
        let progressive = || TaxSchedule::Progressive {
            brackets: rates.standard.clone(),
        };
        let period_rule = |category, sub_type, relief, schedule| CategoryRule {
            category,
            sub_type,
            period_dependent: true,
            basis: Period::Annually,
            relief,
            schedule,
            withholding: None,
        };
        let annual_flat = |category, rate, withholding| CategoryRule {
            category,
            sub_type: None,
            period_dependent: false,
            basis: Period::Annually,
            relief: ReliefRule::Zero,
            schedule: TaxSchedule::Flat { rate },
            withholding,
        };

        let rules = vec![
            period_rule(IncomeCategory::Employment, None, personal.clone(), progressive()),
            period_rule(IncomeCategory::Professional, None, personal.clone(), progressive()),
            period_rule(
                IncomeCategory::Business,
                Some(SubType::General),
                personal.clone(),
                progressive(),
            ),
            period_rule(
                IncomeCategory::Business,
                Some(SubType::Special),
                ReliefRule::Zero,
                TaxSchedule::FlatNoRelief {
                    rate: rates.special_business_rate,
                },
            ),
            period_rule(
                IncomeCategory::Foreign,
                Some(SubType::Remitted),
                ReliefRule::Exempt { threshold: None },
                TaxSchedule::Flat { rate: Decimal::ZERO },
            ),
            period_rule(
                IncomeCategory::Foreign,
                Some(SubType::Other),
                personal.clone(),
                progressive(),
            ),
            CategoryRule {
                withholding: Some(WithholdingRule {
                    rate: dec!(10),
                    threshold: dec!(1200000),
                }),
                ..period_rule(
                    IncomeCategory::Rental,
                    None,
                    ReliefRule::PercentOfGross {
                        rate: dec!(25),
                        standard_amount: Some(rates.personal_relief),
                    },
                    progressive(),
                )
            },
            annual_flat(IncomeCategory::Dividend, rates.dividend_rate, None),
            annual_flat(
                IncomeCategory::Interest,
                rates.interest_rate,
                // LKR 150,000 a month, annualized
                Some(WithholdingRule {
                    rate: dec!(10),
                    threshold: dec!(1800000),
                }),
            ),
            period_rule(IncomeCategory::Royalty, None, personal, progressive()),
            period_rule(
                IncomeCategory::Pension,
                None,
                ReliefRule::Flat {
                    amount: dec!(10000000),
                },
                TaxSchedule::Progressive {
                    brackets: vec![
                        TaxBracket::new(dec!(6), Some(dec!(10000000))),
                        TaxBracket::new(dec!(12), None),
                    ],
                },
            ),
            annual_flat(IncomeCategory::CapitalGains, rates.capital_gains_rate, None),
        ];

        Self { tax_year, rules }
    }
}

struct BuiltInRates {
    personal_relief: Decimal,
    standard: Vec<TaxBracket>,
    special_business_rate: Decimal,
    dividend_rate: Decimal,
    interest_rate: Decimal,
    capital_gains_rate: Decimal,
}

/// Turns bracket widths into cumulative bounds, closing with an unbounded bracket.
fn standard_brackets(
    widths: &[Decimal],
    rates: &[Decimal],
    top_rate: Decimal,
) -> Vec<TaxBracket> {
    let mut bound = Decimal::ZERO;
    let mut brackets: Vec<TaxBracket> = widths
        .iter()
        .zip(rates)
        .map(|(width, rate)| {
            bound += *width;
            TaxBracket::new(*rate, Some(bound))
        })
        .collect();
    brackets.push(TaxBracket::new(top_rate, None));
    brackets
}

fn validate_rate(
    label: &str,
    rate: Decimal,
) -> Result<(), ConfigError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err(ConfigError::RateOutOfRange {
            rule: label.to_string(),
            rate,
        });
    }
    Ok(())
}

fn validate_amount(
    label: &str,
    field: &'static str,
    value: Decimal,
) -> Result<(), ConfigError> {
    if value < Decimal::ZERO {
        return Err(ConfigError::NegativeAmount {
            rule: label.to_string(),
            field,
            value,
        });
    }
    if value > MAX_AMOUNT {
        return Err(ConfigError::AmountTooLarge {
            rule: label.to_string(),
            field,
            value,
        });
    }
    Ok(())
}

fn validate_rule(rule: &CategoryRule) -> Result<(), ConfigError> {
    let label = rule.label();

    if let Some(sub_type) = rule.sub_type {
        if sub_type.category() != rule.category {
            return Err(ConfigError::SubTypeMismatch(label));
        }
    }

    let expected = rule.category.is_period_dependent();
    if rule.period_dependent != expected {
        return Err(ConfigError::PeriodDependenceMismatch {
            rule: label,
            expected,
        });
    }

    match &rule.relief {
        ReliefRule::Zero => {}
        ReliefRule::Flat { amount } => validate_amount(&label, "relief amount", *amount)?,
        ReliefRule::PercentOfGross {
            rate,
            standard_amount,
        } => {
            validate_rate(&label, *rate)?;
            if let Some(amount) = standard_amount {
                validate_amount(&label, "standard relief", *amount)?;
            }
        }
        ReliefRule::Exempt { threshold } => {
            if let Some(threshold) = threshold {
                validate_amount(&label, "exemption threshold", *threshold)?;
            }
        }
    }

    if let Some(withholding) = &rule.withholding {
        validate_rate(&label, withholding.rate)?;
        validate_amount(&label, "withholding threshold", withholding.threshold)?;
    }

    match &rule.schedule {
        TaxSchedule::Flat { rate } | TaxSchedule::FlatNoRelief { rate } => {
            validate_rate(&label, *rate)
        }
        TaxSchedule::Progressive { brackets } => validate_brackets(&label, brackets),
    }
}

fn validate_brackets(
    label: &str,
    brackets: &[TaxBracket],
) -> Result<(), ConfigError> {
    let Some((last, body)) = brackets.split_last() else {
        return Err(ConfigError::EmptySchedule(label.to_string()));
    };

    let mut previous = Decimal::ZERO;
    for bracket in body {
        validate_rate(label, bracket.rate)?;
        let Some(bound) = bracket.upper_bound else {
            return Err(ConfigError::UnboundedBeforeLast(label.to_string()));
        };
        validate_amount(label, "bracket bound", bound)?;
        if bound <= previous {
            return Err(ConfigError::NonIncreasingBound {
                rule: label.to_string(),
                bound,
                previous,
            });
        }
        previous = bound;
    }

    validate_rate(label, last.rate)?;
    if !last.is_unbounded() {
        return Err(ConfigError::BoundedFinalBracket(label.to_string()));
    }
    Ok(())
}
