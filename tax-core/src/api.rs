//! JSON wire contract for the calculator endpoint.
//!
//! Requests accept the field names older front-ends posted (`taxType`,
//! `businessType`, `foreignType`) and amounts as numbers or numeric strings.
//! Responses carry every money value rounded half-up to two decimals; this is
//! the only place results are rounded.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calculations::common::round_half_up;
use crate::error::TaxError;
use crate::models::{BracketLine, IncomeCategory, Period, SubType, TaxRequest, TaxResult};
use crate::registry::TaxYearRegistry;
use crate::utils::parse_decimal;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_year: Option<String>,
}

fn first_non_blank<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .map(str::trim)
        .find(|s| !s.is_empty())
}

impl CalculationRequest {
    /// `category`, falling back to `taxType`.
    pub fn category_name(&self) -> Option<&str> {
        first_non_blank(&[&self.category, &self.tax_type])
    }

    /// `subType`, falling back to `businessType` then `foreignType`.
    pub fn sub_type_name(&self) -> Option<&str> {
        first_non_blank(&[&self.sub_type, &self.business_type, &self.foreign_type])
    }

    pub fn tax_year_label(&self) -> Option<&str> {
        first_non_blank(&[&self.tax_year])
    }

    /// Reads the amount from a JSON number or a numeric string.
    pub fn gross_amount(&self) -> Result<Decimal, TaxError> {
        let invalid = |raw: String| TaxError::InvalidAmount(raw);
        match &self.amount {
            Some(Value::Number(n)) => {
                parse_decimal(&n.to_string()).map_err(|_| invalid(n.to_string()))
            }
            Some(Value::String(s)) => parse_decimal(s).map_err(|_| invalid(s.clone())),
            Some(other) => Err(invalid(other.to_string())),
            None => Err(invalid(String::new())),
        }
    }

    /// Lexically parses the request. Structural validation happens in the engine.
    pub fn to_tax_request(&self) -> Result<TaxRequest, TaxError> {
        let category = self
            .category_name()
            .ok_or_else(|| TaxError::InvalidCategory(String::new()))?;
        TaxRequest::parse(
            category,
            self.sub_type_name(),
            self.period.as_deref(),
            self.gross_amount()?,
        )
    }
}

impl TryFrom<&CalculationRequest> for TaxRequest {
    type Error = TaxError;

    fn try_from(request: &CalculationRequest) -> Result<Self, Self::Error> {
        request.to_tax_request()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketRow {
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    /// Bracket width; `null` for an unbounded or flat row.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub limit: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub taxable_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub cumulative_limit: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub next_limit: Option<Decimal>,
}

impl From<&BracketLine> for BracketRow {
    fn from(line: &BracketLine) -> Self {
        Self {
            rate: line.rate,
            limit: line.width().map(round_half_up),
            taxable_amount: round_half_up(line.taxable_amount),
            tax_amount: round_half_up(line.tax_amount),
            cumulative_limit: round_half_up(line.lower_bound),
            next_limit: line.upper_bound.map(round_half_up),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualEquivalentBody {
    #[serde(with = "rust_decimal::serde::float")]
    pub gross_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResponse {
    pub tax_year: String,
    pub category: IncomeCategory,
    #[serde(rename = "subType")]
    pub sub_type: Option<SubType>,
    pub period: Option<Period>,
    #[serde(with = "rust_decimal::serde::float")]
    pub gross_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub relief_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub taxable_income: Decimal,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub rental_relief: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub net_rental_income: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub standard_relief: Option<Decimal>,
    pub brackets: Vec<BracketRow>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub effective_rate: Decimal,
    pub annual_equivalent: AnnualEquivalentBody,
    pub wht_applicable: bool,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub wht_amount: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub wht_threshold: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub wht_rate: Option<Decimal>,
}

impl From<&TaxResult> for CalculationResponse {
    fn from(result: &TaxResult) -> Self {
        let rental = result.category == IncomeCategory::Rental;
        let withholding = result.withholding.as_ref();
        let annual = result.annual_equivalent();

        Self {
            tax_year: result.tax_year.label(),
            category: result.category,
            sub_type: result.sub_type,
            period: result.period,
            gross_income: round_half_up(result.gross_income),
            relief_amount: round_half_up(result.relief_amount()),
            taxable_income: round_half_up(result.taxable_income),
            rental_relief: rental.then(|| round_half_up(result.relief.category_relief)),
            net_rental_income: rental
                .then(|| round_half_up(result.gross_income - result.relief.category_relief)),
            standard_relief: rental.then(|| round_half_up(result.relief.standard_relief)),
            brackets: result.brackets.iter().map(BracketRow::from).collect(),
            total_tax: round_half_up(result.total_tax),
            effective_rate: round_half_up(result.effective_rate()),
            annual_equivalent: AnnualEquivalentBody {
                gross_income: round_half_up(annual.gross_income),
                total_tax: round_half_up(annual.total_tax),
            },
            wht_applicable: withholding.is_some_and(|w| w.applicable),
            wht_amount: withholding.and_then(|w| w.amount).map(round_half_up),
            wht_threshold: withholding.map(|w| round_half_up(w.threshold)),
            wht_rate: withholding.map(|w| w.rate),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&TaxError> for ErrorResponse {
    fn from(err: &TaxError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearsResponse {
    pub default: String,
    pub tax_years: Vec<String>,
}

impl From<&TaxYearRegistry> for TaxYearsResponse {
    fn from(registry: &TaxYearRegistry) -> Self {
        Self {
            default: registry.default_year().label(),
            tax_years: registry
                .available_years()
                .iter()
                .map(|y| y.label())
                .collect(),
        }
    }
}

/// Parses, computes and renders one calculator request.
pub fn calculate(
    registry: &TaxYearRegistry,
    request: &CalculationRequest,
) -> Result<CalculationResponse, TaxError> {
    let engine = registry.engine(request.tax_year_label())?;
    let result = engine.compute(&request.to_tax_request()?)?;
    Ok(CalculationResponse::from(&result))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    fn request(body: Value) -> CalculationRequest {
        serde_json::from_value(body).unwrap()
    }

    // =========================================================================
    // request parsing
    // =========================================================================

    #[test]
    fn legacy_field_names_are_accepted() {
        let req = request(json!({
            "taxType": "business",
            "businessType": "special",
            "foreignType": "",
            "period": "monthly",
            "amount": "1,000,000"
        }));

        assert_eq!(
            req.to_tax_request().unwrap(),
            TaxRequest::new(IncomeCategory::Business, dec!(1000000))
                .with_sub_type(SubType::Special)
                .with_period(Period::Monthly)
        );
    }

    #[test]
    fn foreign_type_is_used_when_business_type_is_blank() {
        let req = request(json!({
            "category": "foreign",
            "businessType": "",
            "foreignType": "remitted",
            "amount": 10
        }));

        assert_eq!(req.sub_type_name(), Some("remitted"));
    }

    #[test]
    fn numeric_amounts_parse() {
        assert_eq!(request(json!({"amount": 300000})).gross_amount(), Ok(dec!(300000)));
        assert_eq!(request(json!({"amount": 1234.5})).gross_amount(), Ok(dec!(1234.5)));
        assert_eq!(request(json!({"amount": " 42 "})).gross_amount(), Ok(dec!(42)));
    }

    #[test]
    fn unusable_amounts_are_rejected() {
        for body in [
            json!({"amount": "lots"}),
            json!({"amount": ""}),
            json!({"amount": true}),
            json!({}),
        ] {
            assert!(matches!(
                request(body).gross_amount(),
                Err(TaxError::InvalidAmount(_))
            ));
        }
    }

    #[test]
    fn missing_category_is_invalid() {
        let req = request(json!({"amount": 1, "period": "monthly"}));

        assert_eq!(
            req.to_tax_request(),
            Err(TaxError::InvalidCategory(String::new()))
        );
    }

    // =========================================================================
    // response rendering
    // =========================================================================

    #[test]
    fn employment_response_is_rounded() {
        let req = request(json!({
            "category": "employment",
            "period": "monthly",
            "amount": 300000
        }));

        let response = calculate(&TaxYearRegistry::builtin(), &req).unwrap();

        assert_eq!(response.tax_year, "2025/2026");
        assert_eq!(response.relief_amount, dec!(150000));
        assert_eq!(response.total_tax, dec!(18500.00));
        assert_eq!(response.effective_rate, dec!(6.17));
        assert_eq!(
            response.brackets[0],
            BracketRow {
                rate: dec!(6),
                limit: Some(dec!(83333.33)),
                taxable_amount: dec!(83333.33),
                tax_amount: dec!(5000.00),
                cumulative_limit: dec!(0),
                next_limit: Some(dec!(83333.33)),
            }
        );
        assert_eq!(response.annual_equivalent.total_tax, dec!(222000.00));
        assert!(!response.wht_applicable);
        assert_eq!(response.wht_threshold, None);
    }

    #[test]
    fn rental_response_has_relief_split_and_withholding() {
        let req = request(json!({
            "category": "rental",
            "period": "annually",
            "amount": 2000000
        }));

        let response = calculate(&TaxYearRegistry::builtin(), &req).unwrap();

        assert_eq!(response.rental_relief, Some(dec!(500000)));
        assert_eq!(response.net_rental_income, Some(dec!(1500000)));
        assert_eq!(response.standard_relief, Some(dec!(1500000)));
        assert_eq!(response.taxable_income, dec!(0));
        assert!(response.wht_applicable);
        assert_eq!(response.wht_amount, Some(dec!(200000)));
        assert_eq!(response.wht_threshold, Some(dec!(1200000)));
        assert_eq!(response.wht_rate, Some(dec!(10)));
    }

    #[test]
    fn serialized_response_uses_numbers_and_nulls() {
        let req = request(json!({
            "category": "business",
            "subType": "special",
            "period": "annually",
            "amount": 1000000
        }));

        let response = calculate(&TaxYearRegistry::builtin(), &req).unwrap();
        let body = serde_json::to_value(&response).unwrap();

        assert_eq!(body["subType"], json!("special"));
        assert_eq!(body["total_tax"], json!(450000.0));
        assert_eq!(body["brackets"][0]["limit"], Value::Null);
        assert_eq!(body["brackets"][0]["next_limit"], Value::Null);
        assert_eq!(body.get("rental_relief"), None);
    }

    #[test]
    fn tax_year_selects_older_table() {
        let req = request(json!({
            "category": "dividend",
            "amount": 100000,
            "taxYear": "2024/25"
        }));

        let response = calculate(&TaxYearRegistry::builtin(), &req).unwrap();

        assert_eq!(response.tax_year, "2024/2025");
        assert_eq!(response.total_tax, dec!(14000));
        assert_eq!(response.period, None);
    }

    #[test]
    fn unsupported_tax_year_is_an_error() {
        let req = request(json!({"category": "dividend", "amount": 1, "taxYear": "1999"}));

        assert_eq!(
            calculate(&TaxYearRegistry::builtin(), &req),
            Err(TaxError::UnsupportedTaxYear("1999/2000".to_string()))
        );
    }

    #[test]
    fn error_response_carries_message() {
        let err = TaxError::MissingSubType(IncomeCategory::Business);

        assert_eq!(
            ErrorResponse::from(&err).error,
            "business income requires a sub-type (general or special)"
        );
    }

    #[test]
    fn tax_years_response_lists_labels() {
        let body = TaxYearsResponse::from(&TaxYearRegistry::builtin());

        assert_eq!(body.default, "2025/2026");
        assert_eq!(body.tax_years, vec!["2024/2025", "2025/2026"]);
    }
}
