use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tax_core::{ReliefRule, TaxSchedule};
use tax_data::{BracketScheduleLoader, RuleSetLoader};
use tracing_subscriber::EnvFilter;

/// Validate a tax-year rule set and print a summary of it.
///
/// The TOML file holds one tax year: a `tax_year` label and a list of
/// `[[rules]]`. An optional CSV bracket schedule (columns `tax_year`,
/// `category`, `sub_type`, `upper_bound`, `rate`) replaces the brackets of
/// matching progressive rules before validation.
#[derive(Parser, Debug)]
#[command(name = "tax-rules")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the TOML rule set
    #[arg(short, long)]
    file: PathBuf,

    /// Optional CSV bracket schedule to apply on top of the rule set
    #[arg(short, long)]
    brackets: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

fn describe_relief(relief: &ReliefRule) -> String {
    match relief {
        ReliefRule::Zero => "none".to_string(),
        ReliefRule::Flat { amount } => format!("flat {amount}"),
        ReliefRule::PercentOfGross {
            rate,
            standard_amount: Some(standard),
        } => format!("{rate}% of gross, then {standard}"),
        ReliefRule::PercentOfGross { rate, .. } => format!("{rate}% of gross"),
        ReliefRule::Exempt { threshold: None } => "exempt".to_string(),
        ReliefRule::Exempt {
            threshold: Some(threshold),
        } => format!("exempt up to {threshold}"),
    }
}

fn describe_schedule(schedule: &TaxSchedule) -> String {
    match schedule {
        TaxSchedule::Progressive { brackets } => {
            let rates: Vec<String> = brackets.iter().map(|b| format!("{}%", b.rate)).collect();
            format!("progressive [{}]", rates.join(", "))
        }
        TaxSchedule::Flat { rate } => format!("flat {rate}%"),
        TaxSchedule::FlatNoRelief { rate } => format!("flat {rate}% of gross"),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = RuleSetLoader::load(&args.file)
        .with_context(|| format!("Failed to load rule set: {}", args.file.display()))?;

    if let Some(path) = &args.brackets {
        let records = BracketScheduleLoader::parse_file(path)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        println!("Parsed {} bracket records from {}", records.len(), path.display());

        config = BracketScheduleLoader::apply(config, &records)
            .with_context(|| format!("Failed to apply bracket schedule: {}", path.display()))?;
    }

    println!("Tax year {} ({} rules)", config.tax_year(), config.rules().len());
    for rule in config.rules() {
        let period = if rule.period_dependent {
            format!("per period, {} basis", rule.basis)
        } else {
            "period independent".to_string()
        };
        let withholding = rule
            .withholding
            .as_ref()
            .map(|w| format!(", withholding {}% over {}", w.rate, w.threshold))
            .unwrap_or_default();
        println!(
            "  {:<18} {}; relief {}; {}{}",
            rule.label(),
            period,
            describe_relief(&rule.relief),
            describe_schedule(&rule.schedule),
            withholding
        );
    }

    Ok(())
}
