mod category_rule;
mod income_category;
mod relief_rule;
mod tax_bracket;
mod tax_request;
mod tax_result;
mod tax_year;
mod tax_year_config;
mod withholding_rule;

pub use category_rule::{CategoryRule, TaxSchedule};
pub use income_category::{IncomeCategory, Period, SubType};
pub use relief_rule::ReliefRule;
pub use tax_bracket::TaxBracket;
pub use tax_request::{MAX_AMOUNT, TaxRequest};
pub use tax_result::{AnnualEquivalent, BracketLine, ReliefBreakdown, TaxResult, WithholdingOutcome};
pub use tax_year::TaxYear;
pub use tax_year_config::TaxYearConfig;
pub use withholding_rule::WithholdingRule;
