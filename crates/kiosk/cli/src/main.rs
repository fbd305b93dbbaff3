//! kioskctl - drive the kiosk bridge against a simulated device
//!
//! Each invocation builds a fresh simulated device from the flags, wires the
//! bridge to it using the loaded configuration, runs one scenario and prints
//! the resulting state, platform call journal and relayed events.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod error;
mod output;
mod scenario;

use error::CliResult;
use kiosk_bridge::{KioskConfig, LoggingConfig};
use output::OutputFormat;
use scenario::{DeviceArgs, Harness, Scenario};

/// kioskctl application
#[derive(Parser)]
#[command(name = "kioskctl")]
#[command(about = "Kiosk bridge harness over a simulated device", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "KIOSK_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Shorthand for `--output json`
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(flatten)]
    device: DeviceArgs,

    #[command(subcommand)]
    scenario: Scenario,
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        logging.level.clone()
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    // Logs go to stderr so reports on stdout stay machine readable
    let registry = tracing_subscriber::registry().with(env_filter);
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let config = KioskConfig::load(cli.config.as_deref())?;
    init_tracing(&config.logging, cli.verbose);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        cli.output
    };

    let harness = Harness::new(&config, &cli.device)?;
    let report = harness.run(cli.scenario).await?;
    output::print_report(&report, format)
}
