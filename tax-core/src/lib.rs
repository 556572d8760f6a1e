//! Income tax computation engine.
//!
//! [`TaxEngine`] turns a [`TaxRequest`] into an itemized [`TaxResult`] using
//! the rule table of one tax year. [`TaxYearRegistry`] keeps an engine per
//! year, and [`api`] maps the JSON calculator contract onto both.

pub mod api;
pub mod calculations;
pub mod engine;
pub mod error;
pub mod models;
pub mod registry;
pub mod utils;

pub use engine::TaxEngine;
pub use error::{ConfigError, TaxError};
pub use models::*;
pub use registry::TaxYearRegistry;
