//! In-order context creation benchmark
//!
//! Every iteration creates one context for each set size `1..=max_size`,
//! in order. Service failures are logged and skipped, never retried. A
//! drawer error, such as a base network without symbols, ends the run.

use crate::artifact::{format_symbol_list, in_order_artifact_name, write_artifact};
use crate::config::{BenchConfig, SizeBounds};
use crate::error::BenchResult;
use crate::workflows::AttemptError;
use ctxbench_sampling::draw_elements;
use ctxbench_service::{ContextRequest, GraphService};
use rand::Rng;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// Parameters of an in-order run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InOrderSettings {
    /// Network contexts are drawn from
    pub base_name: String,
    /// Passes over all sizes
    pub iterations: usize,
    /// Largest symbol set size
    pub max_size: usize,
    /// Size bounds of every context
    pub bounds: SizeBounds,
    /// Artifact directory
    pub output_dir: PathBuf,
}

impl InOrderSettings {
    /// Settings from a loaded configuration
    ///
    /// # Errors
    /// Returns [`crate::BenchError::Config`] for malformed bounds.
    pub fn from_config(config: &BenchConfig) -> BenchResult<Self> {
        Ok(Self {
            base_name: config.network.base_name.clone(),
            iterations: config.run.iterations,
            max_size: config.run.max_size,
            bounds: config.run.in_order_bounds()?,
            output_dir: config.data.output_dir.clone(),
        })
    }
}

/// Outcome of an in-order run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InOrderReport {
    /// Contexts created and written
    pub created: usize,
    /// Attempts skipped after a failure
    pub skipped: usize,
    /// Written artifacts
    pub artifacts: Vec<PathBuf>,
}

/// Create one context per size and iteration
///
/// # Errors
/// Returns [`crate::BenchError::Io`] if an artifact cannot be written and
/// [`crate::BenchError::Sampling`] if the base network has no symbols.
/// Service failures only skip the attempt.
pub async fn run_in_order<S, R>(
    service: &S,
    settings: &InOrderSettings,
    rng: &mut R,
) -> BenchResult<InOrderReport>
where
    S: GraphService + ?Sized,
    R: Rng + ?Sized,
{
    let mut report = InOrderReport::default();
    for iteration in 1..=settings.iterations {
        for size in 1..=settings.max_size {
            match create(service, settings, iteration, size, rng).await {
                Ok((network_name, graphml, elapsed)) => {
                    tracing::info!(
                        "Created network context {} which took {:.4} seconds",
                        network_name,
                        elapsed.as_secs_f64()
                    );
                    let file_name = in_order_artifact_name(size, iteration, elapsed, &network_name);
                    let path = write_artifact(&settings.output_dir, &file_name, &graphml).await?;
                    report.artifacts.push(path);
                    report.created += 1;
                }
                Err(AttemptError::Sampling(e)) => return Err(e.into()),
                Err(AttemptError::Service(e)) => {
                    tracing::warn!(
                        "Skipping context of size {} in iteration {}, as it could not be generated: {}",
                        size,
                        iteration,
                        e
                    );
                    report.skipped += 1;
                }
            }
        }
    }
    Ok(report)
}

async fn create<S, R>(
    service: &S,
    settings: &InOrderSettings,
    iteration: usize,
    size: usize,
    rng: &mut R,
) -> Result<(String, String, std::time::Duration), AttemptError>
where
    S: GraphService + ?Sized,
    R: Rng + ?Sized,
{
    let base = service.network_by_name(&settings.base_name).await?;
    let symbols = service.node_symbols(&base).await?;
    let drawn = draw_elements(rng, &symbols, size)?;

    let request = ContextRequest {
        network_name: format!(
            "size-{}-iter-{}_{}_{}",
            size,
            iteration,
            format_symbol_list(&drawn),
            settings.bounds
        ),
        symbols: drawn,
        min_size: settings.bounds.min,
        max_size: settings.bounds.max,
    };
    let started = Instant::now();
    let context = service.create_context(&base, &request).await?;
    let elapsed = started.elapsed();
    let graphml = service.export_graphml(&context).await?;

    let name = if context.name.is_empty() {
        request.network_name
    } else {
        context.name
    };
    Ok((name, graphml, elapsed))
}
