use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Income categories the engine knows how to tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeCategory {
    Employment,
    Professional,
    Business,
    Foreign,
    Rental,
    Dividend,
    Interest,
    Royalty,
    Pension,
    CapitalGains,
}

impl IncomeCategory {
    pub const ALL: [IncomeCategory; 10] = [
        Self::Employment,
        Self::Professional,
        Self::Business,
        Self::Foreign,
        Self::Rental,
        Self::Dividend,
        Self::Interest,
        Self::Royalty,
        Self::Pension,
        Self::CapitalGains,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employment => "employment",
            Self::Professional => "professional",
            Self::Business => "business",
            Self::Foreign => "foreign",
            Self::Rental => "rental",
            Self::Dividend => "dividend",
            Self::Interest => "interest",
            Self::Royalty => "royalty",
            Self::Pension => "pension",
            Self::CapitalGains => "capital_gains",
        }
    }

    /// Parses a category name. Case-insensitive; surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employment" => Some(Self::Employment),
            "professional" => Some(Self::Professional),
            "business" => Some(Self::Business),
            "foreign" => Some(Self::Foreign),
            "rental" => Some(Self::Rental),
            "dividend" => Some(Self::Dividend),
            "interest" => Some(Self::Interest),
            "royalty" => Some(Self::Royalty),
            "pension" => Some(Self::Pension),
            "capital_gains" | "capital_gain" => Some(Self::CapitalGains),
            _ => None,
        }
    }

    /// Whether relief and bracket amounts must be scaled to a reporting period.
    pub fn is_period_dependent(&self) -> bool {
        !matches!(self, Self::Dividend | Self::Interest | Self::CapitalGains)
    }

    /// Sub-types this category requires, empty when it defines none.
    pub fn sub_types(&self) -> &'static [SubType] {
        match self {
            Self::Business => &[SubType::General, SubType::Special],
            Self::Foreign => &[SubType::Remitted, SubType::Other],
            _ => &[],
        }
    }

    pub fn sub_type_names(&self) -> Vec<&'static str> {
        self.sub_types().iter().map(SubType::as_str).collect()
    }

    pub fn requires_sub_type(&self) -> bool {
        !self.sub_types().is_empty()
    }
}

impl fmt::Display for IncomeCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category-specific sub-types.
///
/// `General`/`Special` belong to business income (special covers betting,
/// gaming, liquor and tobacco); `Remitted`/`Other` belong to foreign income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubType {
    General,
    Special,
    Remitted,
    Other,
}

impl SubType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Special => "special",
            Self::Remitted => "remitted",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Some(Self::General),
            "special" => Some(Self::Special),
            "remitted" => Some(Self::Remitted),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// The category this sub-type belongs to.
    pub fn category(&self) -> IncomeCategory {
        match self {
            Self::General | Self::Special => IncomeCategory::Business,
            Self::Remitted | Self::Other => IncomeCategory::Foreign,
        }
    }
}

impl fmt::Display for SubType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reporting period of a request or of a rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Monthly,
    Quarterly,
    #[default]
    Annually,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annually => "annually",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            "annually" | "annual" | "yearly" => Some(Self::Annually),
            _ => None,
        }
    }

    /// Number of months covered by one period.
    pub fn months(&self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Annually => 12,
        }
    }

    /// Converts an amount expressed per `self` into one expressed per `to`.
    ///
    /// Multiplies before dividing so whole-year figures split evenly.
    pub fn convert(
        &self,
        amount: Decimal,
        to: Period,
    ) -> Decimal {
        if *self == to {
            return amount;
        }
        amount * Decimal::from(to.months()) / Decimal::from(self.months())
    }

    /// How many of this period make up a year.
    pub fn periods_per_year(&self) -> u32 {
        12 / self.months()
    }
}

impl fmt::Display for Period {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
