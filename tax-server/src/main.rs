use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tax_core::api::{self, CalculationRequest};
use tax_server::{AppState, RegistryConfig, display, logging, router};
use tracing::info;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Income tax calculator (LKR).
///
/// `serve` exposes the calculator as a JSON endpoint; `calculate` runs a
/// single computation and prints the breakdown.
#[derive(Debug, Parser)]
#[command(name = "tax-server", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log filter directive, e.g. `debug` or `info,tax_core=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the calculator over HTTP.
    Serve(ServeArgs),
    /// Compute tax for one income amount and print the result.
    Calculate(CalculateArgs),
}

#[derive(Debug, Args)]
struct RuleArgs {
    /// TOML rule set to register; may be repeated.
    #[arg(long = "rules")]
    rules: Vec<PathBuf>,

    /// CSV bracket schedule applied to the loaded rule sets.
    #[arg(long)]
    brackets: Option<PathBuf>,

    /// Tax year used when a request names none.
    #[arg(long)]
    default_year: Option<String>,
}

impl RuleArgs {
    fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            rule_files: self.rules.clone(),
            bracket_file: self.brackets.clone(),
            default_year: self.default_year.clone(),
        }
    }
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    #[command(flatten)]
    rules: RuleArgs,
}

#[derive(Debug, Args)]
struct CalculateArgs {
    /// Income category, e.g. `employment` or `rental`.
    #[arg(long)]
    category: String,

    /// Sub-type for business (`general`, `special`) or foreign
    /// (`remitted`, `other`) income.
    #[arg(long)]
    sub_type: Option<String>,

    /// `monthly`, `quarterly` or `annually`.
    #[arg(long)]
    period: Option<String>,

    /// Gross amount; thousands separators are allowed.
    #[arg(long)]
    amount: String,

    /// Tax year label, e.g. `2024/2025`.
    #[arg(long)]
    tax_year: Option<String>,

    /// Print the JSON response instead of the text breakdown.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    rules: RuleArgs,
}

impl CalculateArgs {
    fn request(&self) -> CalculationRequest {
        CalculationRequest {
            category: Some(self.category.clone()),
            sub_type: self.sub_type.clone(),
            period: self.period.clone(),
            amount: Some(Value::String(self.amount.clone())),
            tax_year: self.tax_year.clone(),
            ..Default::default()
        }
    }
}

// ─── commands ────────────────────────────────────────────────────────────────

async fn serve(args: ServeArgs) -> Result<()> {
    let registry = args.rules.registry_config().build()?;
    let app = router(AppState::new(registry));

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    info!(addr = %args.bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn calculate(args: &CalculateArgs) -> Result<()> {
    let registry = args.rules.registry_config().build()?;
    let response = api::calculate(&registry, &args.request())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", display::render_breakdown(&response));
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging();
    match (&cli.log_level, &cli.command) {
        (Some(directive), _) => logging::set_log_level(directive)?,
        // keep one-shot output clean unless RUST_LOG asks otherwise
        (None, Command::Calculate(_)) if std::env::var_os("RUST_LOG").is_none() => {
            logging::set_log_level("warn")?
        }
        _ => {}
    }
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }

    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Calculate(args) => calculate(&args),
    }
}
