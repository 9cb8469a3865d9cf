use std::path::PathBuf;

use anyhow::Context;
use betsettle::{input, write_report, LogLevel, OutputFormat, SettlementConfig, SettlementEngine};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Settle a betting ledger from match results and player operations", long_about = None)]
struct Args {
    /// TOML configuration file; command line flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Match results file
    #[arg(long)]
    matches: Option<PathBuf>,

    /// Player operation log file
    #[arg(long)]
    operations: Option<PathBuf>,

    /// Where to write the report
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Log every applied and skipped operation
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn resolve_config(args: &Args) -> anyhow::Result<SettlementConfig> {
    let mut config = match &args.config {
        Some(path) => SettlementConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SettlementConfig::default(),
    };
    if let Some(path) = &args.matches {
        config.match_data_path = path.clone();
    }
    if let Some(path) = &args.operations {
        config.operation_data_path = path.clone();
    }
    if let Some(path) = &args.output {
        config.output_path = path.clone();
    }
    if let Some(format) = args.format {
        config.format = format.into();
    }
    Ok(config)
}

/// Levels for the tracing subscriber and the engine's audit log
fn log_levels(verbose: bool) -> (tracing::Level, LogLevel) {
    if verbose {
        (tracing::Level::DEBUG, LogLevel::Debug)
    } else {
        (tracing::Level::INFO, LogLevel::Info)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (tracing_level, audit_level) = log_levels(args.verbose);
    tracing_subscriber::fmt().with_max_level(tracing_level).init();

    let config = resolve_config(&args)?;

    let matches = input::read_matches(&config.match_data_path)?;
    let operations = input::read_operations(&config.operation_data_path)?;

    let engine = SettlementEngine::builder()
        .with_matches(matches)
        .with_log_level(audit_level)
        .build()?;
    let outcome = engine.run(&operations)?;

    let serializer = config.serializer();
    write_report(serializer.as_ref(), &outcome.report, &config.output_path)?;

    tracing::info!(
        report_hash = %outcome.report_hash,
        duration_ms = outcome.performance_metrics.total_duration_ms,
        "settlement report written"
    );
    println!("Report written to {}", config.output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use betsettle::{Match, MatchResult, Operation, Side};
    use uuid::Uuid;

    #[test]
    fn test_verbose_reaches_audit_log() {
        let (_, quiet) = log_levels(false);
        let (tracing_level, verbose) = log_levels(true);
        assert_eq!(quiet, LogLevel::Info);
        assert_eq!(tracing_level, tracing::Level::DEBUG);

        let player = Uuid::from_u128(1);
        let matches = vec![Match::new(Uuid::from_u128(10), 1.5, 0.5, MatchResult::SideA)]
            .into_iter()
            .collect();
        let engine = SettlementEngine::builder()
            .with_matches(matches)
            .with_log_level(verbose)
            .build()
            .unwrap();
        let outcome = engine
            .run(&[
                Operation::deposit(player, 100),
                Operation::bet(player, Uuid::from_u128(10), 10, Side::A),
            ])
            .unwrap();

        let applied = outcome
            .audit_log
            .iter()
            .filter(|e| e.level == LogLevel::Debug && e.message.ends_with("applied"))
            .count();
        assert_eq!(applied, 2);
    }
}
