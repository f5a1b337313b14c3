//! Netting command-line entry point

use anyhow::Context;
use clap::Parser;
use netting::{Config, NettingEngine};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

/// Simplify a list of debts into fewer settlement payments.
///
/// Reads `payer,payee,amount` records and writes the settlement records in
/// the same format. Configuration is read from the TOML file named by
/// `NETTING_CONFIG`, or from `NETTING_*` environment variables.
#[derive(Parser, Debug)]
#[command(name = "netting", version, about)]
struct Cli {
    /// Transaction records to net
    input: PathBuf,

    /// Settlement output file (default: stdout)
    output: Option<PathBuf>,
}

fn load_config() -> anyhow::Result<Config> {
    match std::env::var_os("NETTING_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            Config::from_file(&path)
                .with_context(|| format!("loading config from {}", path.display()))
        }
        None => Config::from_env().context("loading config from environment"),
    }
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr, stdout carries records
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config()?;

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        input = %cli.input.display(),
        "Starting netting run"
    );

    let input = File::open(&cli.input)
        .with_context(|| format!("opening input {}", cli.input.display()))?;

    let mut writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating output {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let engine = NettingEngine::new(config);
    let report = engine
        .run_records(BufReader::new(input), &mut writer)
        .context("netting failed")?;
    writer.flush()?;

    if !report.is_fully_settled() {
        tracing::warn!(
            parties = report.residual.len(),
            "Some balances could not be matched"
        );
    }

    tracing::info!(
        batch_id = %report.batch_id,
        settlements = report.settlements.len(),
        "Netting run finished"
    );

    Ok(())
}
