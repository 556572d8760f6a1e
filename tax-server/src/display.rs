use std::fmt;

use rust_decimal::Decimal;
use tax_core::{Period, api::CalculationResponse, utils::format_money};

const CURRENCY: &str = "LKR";

fn money(value: Decimal) -> String {
    format!("{CURRENCY} {}", format_money(value))
}

/// Plain-text breakdown of a calculation, as printed by `calculate`.
pub struct Breakdown<'a>(pub &'a CalculationResponse);

impl Breakdown<'_> {
    fn line(
        f: &mut fmt::Formatter<'_>,
        label: &str,
        value: Decimal,
    ) -> fmt::Result {
        writeln!(f, "{label:<22}{:>22}", money(value))
    }

    fn heading(&self) -> String {
        let response = self.0;
        let mut heading = format!("{} income", response.category);
        if let Some(sub_type) = response.sub_type {
            heading.push_str(&format!(" ({sub_type})"));
        }
        if let Some(period) = response.period {
            heading.push_str(&format!(", {period}"));
        }
        heading
    }
}

impl fmt::Display for Breakdown<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let response = self.0;

        writeln!(f, "{} - tax year {}", self.heading(), response.tax_year)?;
        writeln!(f)?;

        Self::line(f, "Gross income", response.gross_income)?;
        if let (Some(rental), Some(net), Some(standard)) = (
            response.rental_relief,
            response.net_rental_income,
            response.standard_relief,
        ) {
            Self::line(f, "  Rental relief", rental)?;
            Self::line(f, "  Net rental income", net)?;
            Self::line(f, "  Standard relief", standard)?;
        }
        Self::line(f, "Relief", response.relief_amount)?;
        Self::line(f, "Taxable income", response.taxable_income)?;

        if !response.brackets.is_empty() {
            writeln!(f)?;
            writeln!(f, "{:>6}  {:>22}  {:>18}", "Rate", "Taxable", "Tax")?;
            for row in &response.brackets {
                writeln!(
                    f,
                    "{:>5}%  {:>22}  {:>18}",
                    row.rate.normalize(),
                    format_money(row.taxable_amount),
                    format_money(row.tax_amount)
                )?;
            }
        }

        writeln!(f)?;
        Self::line(f, "Total tax", response.total_tax)?;
        writeln!(
            f,
            "{:<22}{:>21}%",
            "Effective rate",
            response.effective_rate.normalize()
        )?;
        if response.period.is_some_and(|p| p != Period::Annually) {
            let annual = &response.annual_equivalent;
            Self::line(f, "Annual gross", annual.gross_income)?;
            Self::line(f, "Annual tax", annual.total_tax)?;
        }

        if let Some(threshold) = response.wht_threshold {
            let rate = response.wht_rate.unwrap_or_default().normalize();
            match response.wht_amount {
                Some(amount) if response.wht_applicable => {
                    writeln!(f, "{:<22}{} at {rate}%", "Withholding", money(amount))?
                }
                _ => writeln!(
                    f,
                    "{:<22}not applicable (threshold {})",
                    "Withholding",
                    money(threshold)
                )?,
            }
        }

        Ok(())
    }
}

pub fn render_breakdown(response: &CalculationResponse) -> String {
    Breakdown(response).to_string()
}
