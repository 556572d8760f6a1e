use std::path::PathBuf;

use anyhow::{Context, Result};
use tax_core::{TaxYear, TaxYearRegistry};
use tax_data::{BracketScheduleLoader, RuleSetLoader};
use tracing::{info, warn};

/// Where the server's tax-year tables come from.
///
/// The built-in tables are always present; rule files add new years or
/// replace built-in ones.
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    pub rule_files: Vec<PathBuf>,
    pub bracket_file: Option<PathBuf>,
    pub default_year: Option<String>,
}

impl RegistryConfig {
    /// Loads every rule file, applies the bracket schedule and picks the
    /// default year.
    ///
    /// # Errors
    /// Fails on the first unreadable or invalid file, or when the default
    /// year is not registered.
    pub fn build(&self) -> Result<TaxYearRegistry> {
        let mut registry = TaxYearRegistry::builtin();

        let records = match &self.bracket_file {
            Some(path) => BracketScheduleLoader::parse_file(path)
                .with_context(|| format!("loading bracket schedule {}", path.display()))?,
            None => Vec::new(),
        };

        for path in &self.rule_files {
            let config = RuleSetLoader::load(path)
                .with_context(|| format!("loading rule set {}", path.display()))?;
            let config = BracketScheduleLoader::apply(config, &records)
                .with_context(|| format!("applying bracket schedule to {}", path.display()))?;
            registry.register(config);
        }

        if self.rule_files.is_empty() && !records.is_empty() {
            warn!("bracket schedule given without rule files; ignored");
        }

        if let Some(label) = self.default_year.as_deref() {
            let year = TaxYear::parse(label).with_context(|| format!("default year '{label}'"))?;
            registry
                .set_default(year)
                .with_context(|| format!("default year '{label}'"))?;
        }

        info!(
            default = %registry.default_year(),
            years = registry.available_years().len(),
            "tax-year registry ready"
        );
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn test_data(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../tax-data/test-data")
            .join(name)
    }

    #[test]
    fn empty_config_is_builtin_registry() {
        let registry = RegistryConfig::default().build().unwrap();

        assert_eq!(registry.available_years(), vec![TaxYear(2024), TaxYear(2025)]);
        assert_eq!(registry.default_year(), TaxYear(2025));
    }

    #[test]
    fn rule_files_add_years() {
        let config = RegistryConfig {
            rule_files: vec![test_data("rules_2026_2027.toml")],
            bracket_file: Some(test_data("brackets_2026.csv")),
            default_year: Some("2026/27".to_string()),
        };

        let registry = config.build().unwrap();

        assert_eq!(
            registry.available_years(),
            vec![TaxYear(2024), TaxYear(2025), TaxYear(2026)]
        );
        assert_eq!(registry.default_year(), TaxYear(2026));
    }

    #[test]
    fn unknown_default_year_fails() {
        let config = RegistryConfig {
            default_year: Some("2030/2031".to_string()),
            ..Default::default()
        };

        let err = config.build().unwrap_err();

        assert!(format!("{err:#}").contains("tax year '2030/2031' is not supported"));
    }

    #[test]
    fn missing_rule_file_names_path() {
        let config = RegistryConfig {
            rule_files: vec![test_data("absent.toml")],
            ..Default::default()
        };

        let err = config.build().unwrap_err();

        assert!(err.to_string().contains("absent.toml"));
    }
}
