//! Adaptive context creation benchmark
//!
//! For each size-bound combination, context networks are created from
//! randomly drawn symbol sets until `iterations` of them succeeded. Set
//! sizes come from an [`AdaptiveSizeSampler`], so over a run every size is
//! used about equally often. Only successful iterations adapt the sampler;
//! one whose service calls failed is retried with a freshly picked size.
//! A drawer error, such as a base network without symbols, ends the run.

use crate::artifact::{benchmark_artifact_name, format_symbol_list, write_artifact, ArtifactTimestamp};
use crate::config::{BenchConfig, SizeBounds};
use crate::error::{BenchError, BenchResult};
use crate::workflows::AttemptError;
use ctxbench_sampling::{draw_elements, AdaptiveSizeSampler};
use ctxbench_service::{ContextRequest, GraphService, NetworkInfo, ProviderError};
use rand::Rng;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Parameters of one benchmark run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkSettings {
    /// Network contexts are drawn from
    pub base_name: String,
    /// Successful iterations per combination
    pub iterations: usize,
    /// Largest symbol set size
    pub max_size: usize,
    /// Size bounds, one sampler run each
    pub combinations: Vec<SizeBounds>,
    /// Consecutive failures before giving up
    pub max_consecutive_failures: usize,
    /// Artifact directory
    pub output_dir: PathBuf,
}

impl BenchmarkSettings {
    /// Settings from a loaded configuration
    ///
    /// # Errors
    /// Returns [`BenchError::Config`] for malformed combinations.
    pub fn from_config(config: &BenchConfig) -> BenchResult<Self> {
        Ok(Self {
            base_name: config.network.base_name.clone(),
            iterations: config.run.iterations,
            max_size: config.run.max_size,
            combinations: config.run.size_bounds()?,
            max_consecutive_failures: config.run.max_consecutive_failures,
            output_dir: config.data.output_dir.clone(),
        })
    }
}

/// Outcome of one combination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationReport {
    /// Size bounds of the contexts
    pub bounds: SizeBounds,
    /// Successful iterations
    pub successes: usize,
    /// Failed attempts
    pub failures: usize,
    /// Written artifacts, in creation order
    pub artifacts: Vec<PathBuf>,
    /// Sampler weights after the last adaptation
    pub final_weights: Vec<f64>,
    /// Successful iterations per size, index `size - 1`
    pub size_histogram: Vec<usize>,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BenchmarkReport {
    /// One entry per combination, in configuration order
    pub combinations: Vec<CombinationReport>,
}

impl BenchmarkReport {
    /// Successful iterations over all combinations
    #[must_use]
    pub fn total_successes(&self) -> usize {
        self.combinations.iter().map(|c| c.successes).sum()
    }

    /// Failed attempts over all combinations
    #[must_use]
    pub fn total_failures(&self) -> usize {
        self.combinations.iter().map(|c| c.failures).sum()
    }
}

struct CreatedContext {
    size: usize,
    network_name: String,
    context: NetworkInfo,
    graphml: String,
    elapsed: Duration,
}

struct FailedAttempt {
    network_name: Option<String>,
    error: AttemptError,
}

impl FailedAttempt {
    fn before_naming(error: impl Into<AttemptError>) -> Self {
        Self {
            network_name: None,
            error: error.into(),
        }
    }
}

/// Run the benchmark for every configured combination
///
/// # Errors
/// Returns [`BenchError::TooManyFailures`] when a combination fails
/// `max_consecutive_failures` times in a row, [`BenchError::Io`] if an
/// artifact cannot be written, and [`BenchError::Sampling`] for settings
/// the sampler rejects or a base network with no symbols to draw from.
pub async fn run_benchmark<S, R>(
    service: &S,
    settings: &BenchmarkSettings,
    rng: &mut R,
) -> BenchResult<BenchmarkReport>
where
    S: GraphService + ?Sized,
    R: Rng + ?Sized,
{
    let mut report = BenchmarkReport::default();
    for bounds in &settings.combinations {
        tracing::info!(
            "Creating {} network contexts for minSize/maxSize: {}/{}",
            settings.iterations,
            bounds.min,
            bounds.max
        );
        let combination = run_combination(service, settings, *bounds, rng).await?;
        report.combinations.push(combination);
    }
    Ok(report)
}

/// Run the benchmark for one size-bound combination with a fresh sampler
///
/// # Errors
/// See [`run_benchmark`].
pub async fn run_combination<S, R>(
    service: &S,
    settings: &BenchmarkSettings,
    bounds: SizeBounds,
    rng: &mut R,
) -> BenchResult<CombinationReport>
where
    S: GraphService + ?Sized,
    R: Rng + ?Sized,
{
    let mut sampler = AdaptiveSizeSampler::new(settings.max_size, settings.iterations)?;
    tracing::debug!("Starting weights are: {:?}", sampler.weights());

    let mut report = CombinationReport {
        bounds,
        successes: 0,
        failures: 0,
        artifacts: Vec::new(),
        final_weights: Vec::new(),
        size_histogram: vec![0; settings.max_size],
    };
    let mut consecutive_failures = 0;
    let mut iteration = 1;

    while iteration <= settings.iterations {
        match attempt(service, settings, bounds, iteration, &sampler, rng).await {
            Ok(created) => {
                tracing::info!(
                    "Created network context {} which took {:.4} seconds",
                    created.network_name,
                    created.elapsed.as_secs_f64()
                );
                let artifact_name = if created.context.name.is_empty() {
                    &created.network_name
                } else {
                    &created.context.name
                };
                let file_name =
                    benchmark_artifact_name(&ArtifactTimestamp::now(), created.elapsed, artifact_name);
                let path = write_artifact(&settings.output_dir, &file_name, &created.graphml).await?;

                sampler.adapt(created.size)?;
                tracing::debug!(
                    "Current weights after iteration {} are {:?}",
                    iteration,
                    sampler.weights()
                );

                report.artifacts.push(path);
                report.size_histogram[created.size - 1] += 1;
                report.successes += 1;
                consecutive_failures = 0;
                iteration += 1;
            }
            Err(FailedAttempt {
                error: AttemptError::Sampling(e),
                ..
            }) => return Err(e.into()),
            Err(FailedAttempt {
                network_name,
                error: AttemptError::Service(error),
            }) => {
                report.failures += 1;
                consecutive_failures += 1;
                tracing::warn!(
                    retryable = error.is_retryable(),
                    "Skipping context for {}, as it could not be generated: {}",
                    network_name.as_deref().unwrap_or("<unnamed>"),
                    error
                );
                if consecutive_failures >= settings.max_consecutive_failures {
                    return Err(BenchError::TooManyFailures {
                        attempts: consecutive_failures,
                        last_error: error.to_string(),
                    });
                }
            }
        }
    }

    report.final_weights = sampler.weights().to_vec();
    Ok(report)
}

async fn attempt<S, R>(
    service: &S,
    settings: &BenchmarkSettings,
    bounds: SizeBounds,
    iteration: usize,
    sampler: &AdaptiveSizeSampler,
    rng: &mut R,
) -> Result<CreatedContext, FailedAttempt>
where
    S: GraphService + ?Sized,
    R: Rng + ?Sized,
{
    let base = service
        .network_by_name(&settings.base_name)
        .await
        .map_err(FailedAttempt::before_naming)?;
    let symbols = service
        .node_symbols(&base)
        .await
        .map_err(FailedAttempt::before_naming)?;

    let size = sampler.pick(rng);
    let drawn = draw_elements(rng, &symbols, size).map_err(FailedAttempt::before_naming)?;

    let network_name = format!(
        "number-{}-size-{}-minS-{}-maxS-{}-symbols-{}",
        iteration,
        size,
        bounds.min,
        bounds.max,
        format_symbol_list(&drawn)
    );
    let failed = |error: ProviderError| FailedAttempt {
        network_name: Some(network_name.clone()),
        error: error.into(),
    };

    let request = ContextRequest {
        symbols: drawn,
        network_name: network_name.clone(),
        min_size: bounds.min,
        max_size: bounds.max,
    };
    let started = Instant::now();
    let context = service.create_context(&base, &request).await.map_err(failed)?;
    let elapsed = started.elapsed();

    let graphml = service.export_graphml(&context).await.map_err(failed)?;

    Ok(CreatedContext {
        size,
        network_name,
        context,
        graphml,
        elapsed,
    })
}
