use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use tax_core::api::{self, CalculationRequest};
use tax_core::calculations::common::round_half_up;
use tax_core::{IncomeCategory, Period, SubType, TaxError, TaxRequest, TaxYearRegistry};

fn registry() -> TaxYearRegistry {
    TaxYearRegistry::builtin()
}

fn compute(request: &TaxRequest) -> Result<tax_core::TaxResult, TaxError> {
    registry().engine(None)?.compute(request)
}

// =============================================================================
// Published scenarios, 2025/2026
// =============================================================================

#[test]
fn employment_monthly_300k() {
    let result = compute(
        &TaxRequest::new(IncomeCategory::Employment, dec!(300000)).with_period(Period::Monthly),
    )
    .unwrap();

    assert_eq!(result.relief_amount(), dec!(150000));
    assert_eq!(result.taxable_income, dec!(300000) - result.relief_amount());
    assert_eq!(round_half_up(result.total_tax), dec!(18500.00));
}

#[test]
fn special_business_1m() {
    let result = compute(
        &TaxRequest::new(IncomeCategory::Business, dec!(1000000))
            .with_sub_type(SubType::Special)
            .with_period(Period::Monthly),
    )
    .unwrap();

    assert_eq!(result.total_tax, dec!(450000));
    assert_eq!(result.relief_amount(), Decimal::ZERO);
    let line = &result.brackets[0];
    assert_eq!(
        (line.rate, line.taxable_amount, line.tax_amount),
        (dec!(45), dec!(1000000), dec!(450000))
    );
}

#[test]
fn foreign_remitted_500k() {
    let result = compute(
        &TaxRequest::new(IncomeCategory::Foreign, dec!(500000))
            .with_sub_type(SubType::Remitted)
            .with_period(Period::Annually),
    )
    .unwrap();

    assert_eq!(result.relief_amount(), dec!(500000));
    assert_eq!(result.taxable_income, Decimal::ZERO);
    assert_eq!(result.total_tax, Decimal::ZERO);
}

#[test]
fn rental_annual_1_2m() {
    let result = compute(
        &TaxRequest::new(IncomeCategory::Rental, dec!(1200000)).with_period(Period::Annually),
    )
    .unwrap();

    assert_eq!(result.relief.category_relief, dec!(300000));
    assert!(result.taxable_income < dec!(900000));
    assert!(result.withholding.is_some());
}

#[test]
fn business_without_sub_type() {
    let err = compute(
        &TaxRequest::new(IncomeCategory::Business, dec!(1)).with_period(Period::Annually),
    )
    .unwrap_err();

    assert_eq!(err, TaxError::MissingSubType(IncomeCategory::Business));
}

// =============================================================================
// Wire contract end to end
// =============================================================================

#[test]
fn wire_request_round_trip() {
    let request: CalculationRequest = serde_json::from_value(json!({
        "taxType": "employment",
        "period": "Quarterly",
        "amount": "900,000"
    }))
    .unwrap();

    let response = api::calculate(&registry(), &request).unwrap();
    let body = serde_json::to_value(&response).unwrap();

    // 900,000 - 450,000 relief spreads over the first three quarterly bands
    assert_eq!(body["relief_amount"], json!(450000.0));
    assert_eq!(body["taxable_income"], json!(450000.0));
    assert_eq!(body["period"], json!("quarterly"));
    assert_eq!(body["brackets"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["wht_applicable"], json!(false));
}

#[test]
fn wire_rejections() {
    let cases = [
        (json!({"category": "corporate", "amount": 1}), "invalid income category 'corporate'"),
        (
            json!({"category": "employment", "amount": 1}),
            "employment income requires a period (monthly, quarterly or annually)",
        ),
        (
            json!({"category": "employment", "period": "monthly", "amount": -5}),
            "invalid amount '-5'; expected a non-negative number",
        ),
        (
            json!({"category": "foreign", "subType": "special", "period": "monthly", "amount": 5}),
            "sub-type 'special' is not valid for foreign income",
        ),
    ];

    for (body, message) in cases {
        let request: CalculationRequest = serde_json::from_value(body).unwrap();
        let err = api::calculate(&registry(), &request).unwrap_err();
        assert_eq!(err.to_string(), message);
    }
}

#[test]
fn oversized_wire_amount_is_rejected() {
    for amount in [json!("1e28"), json!("79228162514264337593543950335"), json!(1e27)] {
        let request: CalculationRequest = serde_json::from_value(json!({
            "category": "business",
            "subType": "special",
            "period": "annually",
            "amount": amount
        }))
        .unwrap();

        let err = api::calculate(&registry(), &request).unwrap_err();

        assert!(matches!(err, TaxError::AmountTooLarge(_)), "{err:?}");
        assert!(err.to_string().ends_with("exceeds the maximum of 1,000,000,000,000,000"));
    }
}
