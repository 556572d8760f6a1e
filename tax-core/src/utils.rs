use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
pub enum ParseDecimalError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid decimal '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
}

/// Trims whitespace and drops thousands separators.
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Accepts `1,234.56` style thousands separators and scientific notation
/// (`1.5e6`). Blank input is an error.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Err(ParseDecimalError::Empty);
    }
    normalized
        .parse::<Decimal>()
        .or_else(|e| Decimal::from_scientific(&normalized).map_err(|_| e))
        .map_err(|e| {
            tracing::warn!(input = %s, "invalid decimal: {}", e);
            ParseDecimalError::Invalid {
                input: s.to_string(),
                source: e,
            }
        })
}

/// Formats a money amount with two decimals and comma thousands separators.
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}
