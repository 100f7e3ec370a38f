//! Subcommand runners
//!
//! Each runner returns whether the run counts as passed; the process exit
//! code follows from it.

use ctxbench_core::prelude::*;
use ctxbench_core::workflows::fetch::NetworkSelector;
use ctxbench_service::{GraphServiceFactory, HttpServiceFactory};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn factory(config: &BenchConfig) -> HttpServiceFactory {
    HttpServiceFactory::new(config.server.endpoint())
}

pub(crate) async fn benchmark(config: &BenchConfig, json: bool) -> anyhow::Result<bool> {
    let service = factory(config).connect(Some(BENCHMARK_USER))?;
    let settings = BenchmarkSettings::from_config(config)?;
    let mut rng = StdRng::seed_from_u64(config.random.seed);

    let report = run_benchmark(&service, &settings, &mut rng).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Benchmark Report:");
        for combination in &report.combinations {
            println!("  Bounds: {}", combination.bounds);
            println!("    Successes: {}", combination.successes);
            println!("    Failures: {}", combination.failures);
            println!("    Size Histogram: {:?}", combination.size_histogram);
            println!("    Final Weights: {:?}", combination.final_weights);
        }
        println!("  Total Successes: {}", report.total_successes());
        println!("  Total Failures: {}", report.total_failures());
    }
    Ok(true)
}

pub(crate) async fn benchmark_in_order(config: &BenchConfig, json: bool) -> anyhow::Result<bool> {
    let service = factory(config).connect(Some(BENCHMARK_USER))?;
    let settings = InOrderSettings::from_config(config)?;
    let mut rng = StdRng::seed_from_u64(config.random.seed);

    let report = run_in_order(&service, &settings, &mut rng).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("In-Order Benchmark Report:");
        println!("  Bounds: {}", settings.bounds);
        println!("  Created: {}", report.created);
        println!("  Skipped: {}", report.skipped);
    }
    Ok(true)
}

/// Passes unless a batch failed
pub(crate) async fn symbol_counts(config: &BenchConfig) -> anyhow::Result<bool> {
    let settings = SymbolCountSettings::from_config(config);
    let reports = run_symbol_counts(&factory(config), &settings).await?;

    let mut failed = 0usize;
    println!("Symbol Count Report:");
    for report in &reports {
        let outcome = match &report.outcome {
            BatchOutcome::Exported(path) => format!("exported {}", path.display()),
            BatchOutcome::NoSymbols => "no symbols".to_string(),
            BatchOutcome::Failed(reason) => {
                failed += 1;
                format!("failed: {reason}")
            }
        };
        println!(
            "  {}/{}: {} documents, {} symbols, {} skipped files, {}",
            report.user,
            report.pattern,
            report.documents,
            report.counts.len(),
            report.skipped.len(),
            outcome
        );
    }
    println!("  Batches: {}, Failed: {}", reports.len(), failed);
    Ok(failed == 0)
}

/// Skipped files are reported but do not fail the run
pub(crate) async fn network_per_file(config: &BenchConfig) -> anyhow::Result<bool> {
    let service = factory(config).connect(config.server.user.as_deref())?;
    let settings = PerFileSettings::from_config(config);

    let reports = run_network_per_file(&service, &settings).await?;

    println!("Network Per File Report:");
    for report in &reports {
        match &report.outcome {
            FileOutcome::Exported(path) => {
                println!("  {}: exported {}", report.file, path.display());
            }
            FileOutcome::Skipped(reason) => println!("  {}: skipped, {}", report.file, reason),
        }
    }
    Ok(true)
}

pub(crate) async fn fetch(config: &BenchConfig, selector: &NetworkSelector) -> anyhow::Result<bool> {
    let service = factory(config).connect(config.server.user.as_deref())?;
    let path = fetch_network(&service, selector, &config.data.output_dir).await?;
    println!("Wrote {}", path.display());
    Ok(true)
}
