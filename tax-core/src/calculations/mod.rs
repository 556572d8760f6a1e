//! The six computation stages, in pipeline order.
//!
//! Each stage is a small struct built from the data it needs and exposing a
//! single entry point. [`crate::TaxEngine`] wires them together.

pub mod assembler;
pub mod brackets;
pub mod common;
pub mod period;
pub mod relief;
pub mod resolver;
pub mod withholding;

pub use assembler::ResultAssembler;
pub use brackets::{BracketEngine, BracketOutcome};
pub use period::{NormalizedRule, PeriodNormalizer};
pub use relief::{ReliefCalculator, ReliefOutcome};
pub use resolver::{CategoryResolver, ResolvedRequest};
pub use withholding::WithholdingCalculator;
