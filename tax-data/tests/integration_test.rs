//! Loading the bundled rule files end to end.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::{
    IncomeCategory, Period, SubType, TaxBracket, TaxEngine, TaxRequest, TaxSchedule, TaxYear,
    TaxYearConfig, TaxYearRegistry,
};
use tax_data::{BracketScheduleLoader, RuleLoaderError, RuleSetLoader};

const BRACKETS_2026: &str = include_str!("../test-data/brackets_2026.csv");

fn test_data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test-data")
        .join(name)
}

#[test]
fn bundled_2025_rules_match_builtin_table() {
    let loaded = RuleSetLoader::load(&test_data("rules_2025_2026.toml")).expect("rules should load");

    assert_eq!(loaded, TaxYearConfig::y2025_26());
}

#[test]
fn loaded_rules_compute_like_builtin() {
    let loaded = RuleSetLoader::load(&test_data("rules_2025_2026.toml")).expect("rules should load");
    let engine = TaxEngine::new(loaded);
    let request =
        TaxRequest::new(IncomeCategory::Employment, dec!(300000)).with_period(Period::Monthly);

    let result = engine.compute(&request).expect("should compute");

    assert_eq!(result.total_tax.round_dp(2), dec!(18500));
}

#[test]
fn draft_year_takes_brackets_from_csv() {
    let draft = RuleSetLoader::load(&test_data("rules_2026_2027.toml")).expect("rules should load");
    let records = BracketScheduleLoader::parse(BRACKETS_2026.as_bytes()).expect("CSV should parse");

    let config = BracketScheduleLoader::apply(draft, &records).expect("brackets should apply");

    assert_eq!(config.tax_year(), TaxYear(2026));
    for (category, sub_type) in [
        (IncomeCategory::Employment, None),
        (IncomeCategory::Business, Some(SubType::General)),
    ] {
        let rule = config.rule(category, sub_type).expect("rule should exist");
        let TaxSchedule::Progressive { brackets } = &rule.schedule else {
            panic!("expected progressive schedule for {}", rule.label());
        };
        assert_eq!(brackets.len(), 5);
        assert_eq!(brackets[0], TaxBracket::new(dec!(6), Some(dec!(1200000))));
        assert_eq!(brackets[4], TaxBracket::new(dec!(36), None));
    }
}

#[test]
fn draft_year_registers_alongside_builtins() {
    let draft = RuleSetLoader::load(&test_data("rules_2026_2027.toml")).expect("rules should load");
    let records = BracketScheduleLoader::parse(BRACKETS_2026.as_bytes()).expect("CSV should parse");
    let config = BracketScheduleLoader::apply(draft, &records).expect("brackets should apply");

    let mut registry = TaxYearRegistry::builtin();
    registry.register(config);

    let engine = registry.engine(Some("2026/2027")).expect("year should be registered");
    let result = engine
        .compute(
            &TaxRequest::new(IncomeCategory::Employment, dec!(3000000))
                .with_period(Period::Annually),
        )
        .expect("should compute");

    // 1,200,000 taxable, all inside the widened first bracket
    assert_eq!(result.total_tax, dec!(72000));

    let missing = engine.compute(
        &TaxRequest::new(IncomeCategory::Rental, dec!(1)).with_period(Period::Annually),
    );
    assert!(missing.is_err());
}

#[test]
fn only_rows_for_the_config_year_apply() {
    let records = BracketScheduleLoader::parse(BRACKETS_2026.as_bytes()).expect("CSV should parse");

    let config = BracketScheduleLoader::apply(TaxYearConfig::y2025_26(), &records)
        .expect("brackets should apply");

    let builtin = TaxYearConfig::y2025_26();
    let employment = config.rule(IncomeCategory::Employment, None).expect("rule should exist");
    assert_eq!(
        employment.schedule,
        TaxSchedule::Progressive {
            brackets: vec![
                TaxBracket::new(dec!(99), Some(dec!(1))),
                TaxBracket::new(dec!(99), None),
            ]
        }
    );
    assert_eq!(
        config.rule(IncomeCategory::Business, Some(SubType::General)),
        builtin.rule(IncomeCategory::Business, Some(SubType::General))
    );
}

#[test]
fn missing_rule_file_reports_path() {
    let err = RuleSetLoader::load(&test_data("nope.toml")).unwrap_err();

    let RuleLoaderError::Io { path, .. } = err else {
        panic!("expected Io error, got: {err:?}");
    };
    assert!(path.ends_with("nope.toml"), "got: {path}");
}
