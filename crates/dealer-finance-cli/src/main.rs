mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::emi::EmiArgs;
use commands::pricing::OnRoadArgs;
use commands::quote::{FinanceArgs, QuoteArgs};
use dealer_finance_core::quote::ValidationErrorBody;
use dealer_finance_core::DealerFinanceError;

/// Dealership on-road pricing and EMI calculations
#[derive(Parser)]
#[command(
    name = "dfc",
    version,
    about = "Dealership on-road pricing and EMI calculations",
    long_about = "Computes on-road price breakdowns (road tax, registration, insurance, \
                  FASTag, HSRP, TCS) and reducing-balance EMIs with an amortization \
                  preview, using decimal precision throughout."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Dealer config overriding the fee schedule and loan bounds (YAML or JSON)
    #[arg(long, global = true, env = "DFC_CONFIG")]
    config: Option<String>,

    /// Log filter when RUST_LOG is unset (e.g. "debug", "dealer_finance_core=trace")
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// On-road price breakdown from an ex-showroom price
    OnRoad(OnRoadArgs),
    /// EMI, totals and amortization preview for a vehicle loan
    Emi(EmiArgs),
    /// On-road quote for a catalog model/variant/colour with accessories
    Quote(QuoteArgs),
    /// On-road quote financed on an EMI
    Finance(FinanceArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = match input::config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "config error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::OnRoad(args) => commands::pricing::run_on_road(args, &config),
        Commands::Emi(args) => commands::emi::run_emi(args, &config),
        Commands::Quote(args) => commands::quote::run_quote(args, &config),
        Commands::Finance(args) => commands::quote::run_finance(args, &config),
        Commands::Version => {
            println!("dfc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            let body = e
                .downcast_ref::<DealerFinanceError>()
                .and_then(ValidationErrorBody::from_error);
            match body {
                Some(body) => {
                    tracing::debug!(field = %body.field, "rejected input");
                    if matches!(cli.output, OutputFormat::Json) {
                        output::json::print_serializable(&body);
                    } else {
                        eprintln!(
                            "{}: {} — {}",
                            "invalid input".red().bold(),
                            body.field,
                            body.reason
                        );
                    }
                    process::exit(2);
                }
                None => {
                    eprintln!("{}: {}", "error".red().bold(), e);
                    process::exit(1);
                }
            }
        }
    }
}
