use std::collections::HashMap;

use tracing::{debug, info};

use crate::engine::TaxEngine;
use crate::error::TaxError;
use crate::models::{TaxYear, TaxYearConfig};

/// Engines for every supported tax year, keyed by year.
///
/// Typical lifetime:
/// 1. Start from [`TaxYearRegistry::builtin`] (or `new` for an empty one).
/// 2. `register` any extra configs loaded at startup.
/// 3. Share behind an `Arc` and call [`TaxYearRegistry::engine`] per request.
#[derive(Debug, Clone)]
pub struct TaxYearRegistry {
    engines: HashMap<TaxYear, TaxEngine>,
    default_year: TaxYear,
}

impl TaxYearRegistry {
    /// An empty registry whose default is `default_year`.
    pub fn new(default_year: TaxYear) -> Self {
        Self {
            engines: HashMap::new(),
            default_year,
        }
    }

    /// The 2024/2025 and 2025/2026 tables, defaulting to 2025/2026.
    pub fn builtin() -> Self {
        let mut registry = Self::new(TaxYear(2025));
        registry.register(TaxYearConfig::y2024_25());
        registry.register(TaxYearConfig::y2025_26());
        registry
    }

    /// Register a tax year. An existing config for the same year is replaced.
    pub fn register(
        &mut self,
        config: TaxYearConfig,
    ) {
        let year = config.tax_year();
        if self.engines.insert(year, TaxEngine::new(config)).is_some() {
            info!(tax_year = %year, "replaced tax year configuration");
        } else {
            debug!(tax_year = %year, "registered tax year");
        }
    }

    /// Makes `year` the default used by requests that name no tax year.
    ///
    /// # Errors
    /// [`TaxError::UnsupportedTaxYear`] if `year` is not registered.
    pub fn set_default(
        &mut self,
        year: TaxYear,
    ) -> Result<(), TaxError> {
        if !self.engines.contains_key(&year) {
            return Err(TaxError::UnsupportedTaxYear(year.label()));
        }
        self.default_year = year;
        Ok(())
    }

    pub fn default_year(&self) -> TaxYear {
        self.default_year
    }

    /// Every registered tax year, oldest first.
    pub fn available_years(&self) -> Vec<TaxYear> {
        let mut years: Vec<_> = self.engines.keys().copied().collect();
        years.sort_unstable();
        years
    }

    /// Engine for a tax-year label, or the default year when `label` is
    /// `None` or blank.
    ///
    /// # Errors
    /// [`TaxError::UnsupportedTaxYear`] when the label does not parse or the
    /// year is not registered.
    pub fn engine(
        &self,
        label: Option<&str>,
    ) -> Result<&TaxEngine, TaxError> {
        let year = match label.map(str::trim).filter(|s| !s.is_empty()) {
            Some(label) => {
                TaxYear::parse(label).map_err(|_| TaxError::UnsupportedTaxYear(label.to_string()))?
            }
            None => self.default_year,
        };

        self.engines
            .get(&year)
            .ok_or_else(|| TaxError::UnsupportedTaxYear(year.label()))
    }
}

impl Default for TaxYearRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
