//! Rule-table loaders: CSV bracket schedules and TOML tax-year rule sets.

mod loader;

pub use loader::{BracketRecord, BracketScheduleLoader, RuleLoaderError, RuleSetLoader};
