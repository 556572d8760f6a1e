use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{IncomeCategory, Period, ReliefRule, SubType, TaxBracket, WithholdingRule};

/// How taxable income is turned into tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaxSchedule {
    /// Marginal rates over cumulative bounds.
    Progressive { brackets: Vec<TaxBracket> },

    /// One rate on the whole taxable income.
    Flat { rate: Decimal },

    /// One rate on the whole gross amount. Relief is never applied, whatever
    /// the rule's relief says.
    FlatNoRelief { rate: Decimal },
}

impl TaxSchedule {
    pub fn is_flat(&self) -> bool {
        !matches!(self, Self::Progressive { .. })
    }

    /// Converts bracket bounds from `from` to `to`; rates are unchanged.
    pub fn scaled(
        &self,
        from: Period,
        to: Period,
    ) -> Self {
        match self {
            Self::Progressive { brackets } => Self::Progressive {
                brackets: brackets
                    .iter()
                    .map(|b| TaxBracket::new(b.rate, b.upper_bound.map(|u| from.convert(u, to))))
                    .collect(),
            },
            flat => flat.clone(),
        }
    }
}

/// Declarative tax treatment of one (category, sub-type) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCategoryRule")]
pub struct CategoryRule {
    pub category: IncomeCategory,
    pub sub_type: Option<SubType>,
    /// Whether a request must name a period and amounts are scaled to it.
    /// Must equal [`IncomeCategory::is_period_dependent`].
    pub period_dependent: bool,
    /// Period the currency amounts in this rule are expressed in.
    pub basis: Period,
    pub relief: ReliefRule,
    pub schedule: TaxSchedule,
    pub withholding: Option<WithholdingRule>,
}

/// Rule as written in a rule file; `period_dependent` defaults from the category.
#[derive(Deserialize)]
struct RawCategoryRule {
    category: IncomeCategory,
    #[serde(default)]
    sub_type: Option<SubType>,
    #[serde(default)]
    period_dependent: Option<bool>,
    #[serde(default)]
    basis: Period,
    relief: ReliefRule,
    schedule: TaxSchedule,
    #[serde(default)]
    withholding: Option<WithholdingRule>,
}

impl From<RawCategoryRule> for CategoryRule {
    fn from(raw: RawCategoryRule) -> Self {
        Self {
            category: raw.category,
            sub_type: raw.sub_type,
            period_dependent: raw
                .period_dependent
                .unwrap_or_else(|| raw.category.is_period_dependent()),
            basis: raw.basis,
            relief: raw.relief,
            schedule: raw.schedule,
            withholding: raw.withholding,
        }
    }
}

impl CategoryRule {
    /// `employment`, `business/special`, ...
    pub fn label(&self) -> String {
        match self.sub_type {
            Some(sub_type) => format!("{}/{}", self.category, sub_type),
            None => self.category.to_string(),
        }
    }

    pub fn matches(
        &self,
        category: IncomeCategory,
        sub_type: Option<SubType>,
    ) -> bool {
        self.category == category && self.sub_type == sub_type
    }
}
