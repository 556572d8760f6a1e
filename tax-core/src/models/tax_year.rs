use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// Tax year running from 1 April to 31 March.
/// The value is the starting calendar year (2025 = the 2025/2026 year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxYear(pub i32);

fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(\d{4})\s*(?:[/-]\s*(\d{2}|\d{4}))?\s*$").expect("static pattern")
    })
}

impl TaxYear {
    /// Parses `2025/2026`, `2025/26`, `2025-26` or a bare `2025`.
    ///
    /// The second year, when present, must follow the first.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidTaxYear(s.to_string());
        let caps = label_pattern().captures(s).ok_or_else(invalid)?;
        let start: i32 = caps[1].parse().map_err(|_| invalid())?;

        if let Some(end) = caps.get(2) {
            let end_str = end.as_str();
            let end: i32 = end_str.parse().map_err(|_| invalid())?;
            let expected = if end_str.len() == 2 {
                (start + 1) % 100
            } else {
                start + 1
            };
            if end != expected {
                return Err(invalid());
            }
        }

        Ok(TaxYear(start))
    }

    /// Display as "2025/2026".
    pub fn label(&self) -> String {
        format!("{}/{}", self.0, self.0 + 1)
    }
}

impl fmt::Display for TaxYear {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for TaxYear {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for TaxYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TaxYear::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_full_label() {
        assert_eq!(TaxYear::parse("2025/2026"), Ok(TaxYear(2025)));
    }

    #[test]
    fn parse_short_label() {
        assert_eq!(TaxYear::parse("2024/25"), Ok(TaxYear(2024)));
        assert_eq!(TaxYear::parse("2024-25"), Ok(TaxYear(2024)));
    }

    #[test]
    fn parse_bare_year() {
        assert_eq!(TaxYear::parse(" 2025 "), Ok(TaxYear(2025)));
    }

    #[test]
    fn parse_short_label_across_century() {
        assert_eq!(TaxYear::parse("2099/00"), Ok(TaxYear(2099)));
    }

    #[test]
    fn parse_rejects_non_consecutive_years() {
        assert_eq!(
            TaxYear::parse("2025/2027"),
            Err(ConfigError::InvalidTaxYear("2025/2027".to_string()))
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(TaxYear::parse("next year").is_err());
        assert!(TaxYear::parse("").is_err());
    }

    #[test]
    fn label_round_trips() {
        assert_eq!(TaxYear(2024).label(), "2024/2025");
        assert_eq!(TaxYear::parse(&TaxYear(2024).label()), Ok(TaxYear(2024)));
    }
}
