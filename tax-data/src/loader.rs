use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{ConfigError, IncomeCategory, SubType, TaxBracket, TaxYear, TaxYearConfig};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading rule tables.
#[derive(Debug, Error)]
pub enum RuleLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    #[error("invalid rule table: {0}")]
    Config(#[from] ConfigError),
}

impl From<csv::Error> for RuleLoaderError {
    fn from(err: csv::Error) -> Self {
        RuleLoaderError::CsvParse(err.to_string())
    }
}

impl From<toml::de::Error> for RuleLoaderError {
    fn from(err: toml::de::Error) -> Self {
        RuleLoaderError::TomlParse(err.to_string())
    }
}

fn read_file(path: &Path) -> Result<String, RuleLoaderError> {
    fs::read_to_string(path).map_err(|e| RuleLoaderError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// A single record from a bracket schedule CSV file.
///
/// - `tax_year`: label such as `2025/2026`
/// - `category`: income category name
/// - `sub_type`: sub-type name, empty for categories without one
/// - `upper_bound`: cumulative upper bound, empty for the final bracket
/// - `rate`: marginal rate as a percentage (e.g. `18` for 18%)
///
/// Rows for one (tax year, category, sub-type) must appear in bracket order.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: String,
    pub category: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub sub_type: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

type ScheduleKey = (IncomeCategory, Option<SubType>);

/// Loader for bracket schedules kept in CSV files.
///
/// A schedule file replaces the brackets of progressive rules in an existing
/// [`TaxYearConfig`]; relief, withholding and flat rates stay as configured.
pub struct BracketScheduleLoader;

impl BracketScheduleLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, RuleLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    pub fn parse_file(path: &Path) -> Result<Vec<BracketRecord>, RuleLoaderError> {
        Self::parse(read_file(path)?.as_bytes())
    }

    /// Groups the records that belong to `tax_year` by category and sub-type,
    /// keeping file order within each group.
    ///
    /// Records for other tax years are skipped.
    pub fn schedules(
        tax_year: TaxYear,
        records: &[BracketRecord],
    ) -> Result<Vec<(ScheduleKey, Vec<TaxBracket>)>, RuleLoaderError> {
        let mut order: Vec<ScheduleKey> = Vec::new();
        let mut groups: HashMap<ScheduleKey, Vec<TaxBracket>> = HashMap::new();

        for (index, record) in records.iter().enumerate() {
            // header is line 1
            let line = index + 2;
            let invalid = |reason: String| RuleLoaderError::InvalidRecord { line, reason };

            let year = TaxYear::parse(&record.tax_year).map_err(|e| invalid(e.to_string()))?;
            if year != tax_year {
                continue;
            }

            let category = IncomeCategory::parse(&record.category)
                .ok_or_else(|| invalid(format!("unknown category '{}'", record.category)))?;
            let sub_type = record
                .sub_type
                .as_deref()
                .map(|raw| {
                    SubType::parse(raw).ok_or_else(|| invalid(format!("unknown sub-type '{raw}'")))
                })
                .transpose()?;

            let key = (category, sub_type);
            if !groups.contains_key(&key) {
                order.push(key);
            }
            groups
                .entry(key)
                .or_default()
                .push(TaxBracket::new(record.rate, record.upper_bound));
        }

        Ok(order
            .into_iter()
            .filter_map(|key| groups.remove(&key).map(|brackets| (key, brackets)))
            .collect())
    }

    /// Applies every schedule for the config's tax year.
    ///
    /// # Errors
    /// Returns [`RuleLoaderError::Config`] when a replacement schedule is
    /// invalid, and [`RuleLoaderError::InvalidRecord`] for unknown names.
    pub fn apply(
        config: TaxYearConfig,
        records: &[BracketRecord],
    ) -> Result<TaxYearConfig, RuleLoaderError> {
        let tax_year = config.tax_year();
        let mut config = config;

        for ((category, sub_type), brackets) in Self::schedules(tax_year, records)? {
            if config.rule(category, sub_type).is_none() {
                debug!(%category, ?sub_type, "no rule for bracket schedule; skipped");
                continue;
            }
            info!(
                %tax_year,
                %category,
                ?sub_type,
                brackets = brackets.len(),
                "replacing bracket schedule"
            );
            config = config.with_brackets(category, sub_type, brackets)?;
        }

        Ok(config)
    }
}

/// Loader for complete tax-year rule sets written in TOML.
///
/// ```toml
/// tax_year = "2025/2026"
///
/// [[rules]]
/// category = "dividend"
/// period_dependent = false
/// relief = { kind = "zero" }
/// schedule = { kind = "flat", rate = 15 }
/// ```
pub struct RuleSetLoader;

impl RuleSetLoader {
    /// Parse and validate a rule set.
    pub fn parse(source: &str) -> Result<TaxYearConfig, RuleLoaderError> {
        let config: TaxYearConfig = toml::from_str(source)?;
        debug!(
            tax_year = %config.tax_year(),
            rules = config.rules().len(),
            "parsed rule set"
        );
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<TaxYearConfig, RuleLoaderError> {
        let config = Self::parse(&read_file(path)?)?;
        info!(
            path = %path.display(),
            tax_year = %config.tax_year(),
            "loaded rule set"
        );
        Ok(config)
    }
}
