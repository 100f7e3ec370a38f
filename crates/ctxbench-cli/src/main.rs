//! `ctxbench` command line

mod cli;
mod commands;
mod logging;

use anyhow::Context;
use clap::ArgMatches;
use ctxbench_core::BenchConfig;
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    let matches = cli::build_cli().get_matches();

    let ok = match run(&matches).await {
        Ok(ok) => ok,
        Err(err) => {
            eprintln!("Error: {err:#}");
            false
        }
    };

    std::process::exit(if ok { 0 } else { 1 });
}

async fn run(matches: &ArgMatches) -> anyhow::Result<bool> {
    let path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(cli::DEFAULT_CONFIG));
    let mut config = BenchConfig::from_file(&path)
        .with_context(|| format!("loading configuration from {}", path.display()))?;

    let Some((command, args)) = matches.subcommand() else {
        anyhow::bail!("no command given");
    };
    cli::apply_overrides(&mut config, args)?;
    logging::init(&config.logging)?;

    tracing::info!(command, config = %path.display(), "Starting ctxbench {}", ctxbench_core::VERSION);

    match command {
        "benchmark" => commands::benchmark(&config, cli::wants_json(args)).await,
        "benchmark-in-order" => commands::benchmark_in_order(&config, cli::wants_json(args)).await,
        "symbol-counts" => commands::symbol_counts(&config).await,
        "network-per-file" => commands::network_per_file(&config).await,
        "fetch" => {
            let selector = cli::selector(args).context("fetch needs --uuid or --name")?;
            commands::fetch(&config, &selector).await
        }
        other => anyhow::bail!("unknown command: {other}"),
    }
}
