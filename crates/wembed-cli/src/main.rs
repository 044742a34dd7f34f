mod cli;

use anyhow::Context;
use clap::ArgMatches;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use wembed_core::Embedder;

fn main() -> ExitCode {
    let matches = cli::build_cli().get_matches();
    let (command, args) = match matches.subcommand() {
        Some((name, sub)) => (name, sub),
        None => ("embed", &matches),
    };

    init_logging(args);

    match run(command, args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(args: &ArgMatches) {
    let level = if args.get_flag("quiet") {
        "error"
    } else {
        match args.get_count("verbose") {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: &str, args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let config = cli::resolve_config(args)?;
    tracing::debug!("Resolved config: {config:?}");
    let embedder = Embedder::new(config)?;

    match command {
        "embed" => {
            embedder.run().context("embed failed")?;
            Ok(ExitCode::SUCCESS)
        }
        "check" => {
            let report = embedder.check().context("check failed")?;
            if report.is_up_to_date() {
                println!(
                    "{} is up to date ({} marker(s), artifact {})",
                    report.target.display(),
                    report.markers,
                    report.digest.short()
                );
                Ok(ExitCode::SUCCESS)
            } else {
                let lines = report
                    .stale_lines
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                println!(
                    "{} is stale: line(s) {lines} do not match artifact {}",
                    report.target.display(),
                    report.digest.short()
                );
                Ok(ExitCode::FAILURE)
            }
        }
        "extract" => {
            let index = args.get_one::<usize>("index").copied().unwrap_or(0);
            let output = args
                .get_one::<PathBuf>("output")
                .context("--output is required")?;
            let artifact = embedder.extract(index).context("extract failed")?;
            std::fs::write(output, artifact.data())
                .with_context(|| format!("failed to write {}", output.display()))?;
            Ok(ExitCode::SUCCESS)
        }
        other => anyhow::bail!("unknown command: {other}"),
    }
}
