//! Symbol count annotation of exported networks
//!
//! `graphml_dir` holds one folder per service user. For every folder and
//! every file pattern, the symbols of the matching GraphML files are
//! counted; a context of all counted symbols is created from the base
//! network, annotated with a presence flag and the counts, and exported.

use crate::artifact::{export_artifact_name, write_artifact};
use crate::config::BenchConfig;
use crate::error::BenchResult;
use crate::workflows::{list_entries, EntryKind};
use ctxbench_graphml::{
    count_annotation, presence_annotation, FilePattern, SkipReason, SkippedFile, SymbolAggregator,
    SymbolCount,
};
use ctxbench_service::{ContextRequest, GraphService, GraphServiceFactory, NetworkInfo};
use std::path::{Path, PathBuf};

/// Parameters of a symbol count run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolCountSettings {
    /// Network contexts are created from
    pub base_name: String,
    /// Folder of per-user folders
    pub graphml_dir: PathBuf,
    /// Export directory
    pub output_dir: PathBuf,
    /// One batch per pattern and user
    pub file_patterns: Vec<String>,
    /// Name of the presence annotation
    pub presence_name: String,
    /// Network name of the presence annotation
    pub presence_target: String,
    /// Name of the count annotation
    pub count_name: String,
}

impl SymbolCountSettings {
    /// Settings from a loaded configuration
    #[must_use]
    pub fn from_config(config: &BenchConfig) -> Self {
        Self {
            base_name: config.network.base_name.clone(),
            graphml_dir: config.data.graphml_dir.clone(),
            output_dir: config.data.output_dir.clone(),
            file_patterns: config.data.file_patterns.clone(),
            presence_name: config.annotation.presence_name.clone(),
            presence_target: config.annotation.presence_target.clone(),
            count_name: config.annotation.count_name.clone(),
        }
    }
}

/// How a batch ended
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// Annotated network written to this path
    Exported(PathBuf),
    /// No matching file contributed a symbol
    NoSymbols,
    /// A service call or payload failed
    Failed(String),
}

/// Outcome of one user/pattern batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// Service user, the folder name
    pub user: String,
    /// File pattern of the batch
    pub pattern: String,
    /// Documents folded into the count
    pub documents: usize,
    /// Final symbol counts
    pub counts: SymbolCount,
    /// Files left out
    pub skipped: Vec<SkippedFile>,
    /// How the batch ended
    pub outcome: BatchOutcome,
}

/// Count, annotate and export every user/pattern batch
///
/// # Errors
/// Returns [`crate::BenchError::Io`] if a folder cannot be listed or an export
/// cannot be written, and [`crate::BenchError::Provider`] if no service can be
/// opened for a user. A failing service call only fails its batch.
pub async fn run_symbol_counts<F>(
    factory: &F,
    settings: &SymbolCountSettings,
) -> BenchResult<Vec<BatchReport>>
where
    F: GraphServiceFactory,
{
    if settings.file_patterns.is_empty() {
        tracing::warn!("No file patterns configured, nothing to count");
    }

    let mut reports = Vec::new();
    for (user, folder) in list_entries(&settings.graphml_dir, EntryKind::Dir).await? {
        tracing::info!("Beginning processing of folder {}", user);
        let service = factory.connect(Some(user.as_str()))?;

        for pattern in &settings.file_patterns {
            tracing::info!("Beginning processing of file pattern {}", pattern);
            let aggregator = count_symbols(&folder, FilePattern::new(pattern.as_str())).await?;

            let outcome = if aggregator.counts().is_empty() {
                tracing::warn!(
                    "No symbols found for user {} and pattern {}, skipping batch",
                    user,
                    pattern
                );
                BatchOutcome::NoSymbols
            } else {
                match annotate_counts(&service, settings, &user, pattern, aggregator.counts()).await {
                    Ok((network, graphml)) => {
                        let file_name = export_artifact_name(&network.name);
                        let path = write_artifact(&settings.output_dir, &file_name, &graphml).await?;
                        tracing::info!("Wrote graphml file {}", path.display());
                        BatchOutcome::Exported(path)
                    }
                    Err(e) => {
                        tracing::error!(
                            "Batch for user {} and pattern {} failed: {}",
                            user,
                            pattern,
                            e
                        );
                        BatchOutcome::Failed(e.to_string())
                    }
                }
            };

            reports.push(BatchReport {
                user: user.clone(),
                pattern: pattern.clone(),
                documents: aggregator.documents_folded(),
                skipped: aggregator.skipped().to_vec(),
                counts: aggregator.into_counts(),
                outcome,
            });
        }
        tracing::info!("Finished processing of folder {}", user);
    }
    Ok(reports)
}

/// Fold the symbols of every matching file in `folder`
///
/// Unreadable files are recorded as skipped.
///
/// # Errors
/// Returns [`crate::BenchError::Io`] if `folder` cannot be listed.
pub async fn count_symbols(folder: &Path, pattern: FilePattern) -> BenchResult<SymbolAggregator> {
    let mut aggregator = SymbolAggregator::new(pattern);
    for (name, path) in list_entries(folder, EntryKind::File).await? {
        if !aggregator.accepts(&name) {
            continue;
        }
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                aggregator.fold_document(&name, &text);
            }
            Err(e) => {
                tracing::warn!("Could not read {}: {}", path.display(), e);
                aggregator.record_skip(&name, SkipReason::Unreadable(e.to_string()));
            }
        }
    }
    tracing::info!(
        "Counted {} distinct symbols in {} files of {}",
        aggregator.counts().len(),
        aggregator.documents_folded(),
        folder.display()
    );
    Ok(aggregator)
}

async fn annotate_counts<S>(
    service: &S,
    settings: &SymbolCountSettings,
    user: &str,
    pattern: &str,
    counts: &SymbolCount,
) -> BenchResult<(NetworkInfo, String)>
where
    S: GraphService + ?Sized,
{
    let symbols: Vec<String> = counts.keys().cloned().collect();
    let base = service.network_by_name(&settings.base_name).await?;

    tracing::info!("Starting context creation with {} symbols", symbols.len());
    let request = ContextRequest {
        symbols: symbols.clone(),
        network_name: format!("context_{}_{}_{}", user, pattern, base.mapping_type),
        min_size: 0,
        max_size: 0,
    };
    let context = service.create_context(&base, &request).await?;

    let presence = presence_annotation(&settings.presence_name, &symbols);
    let flagged = service
        .annotate(&context, &presence, &settings.presence_target, true)
        .await?;

    let count = count_annotation(&settings.count_name, &symbols, counts)?;
    let annotated = service.annotate(&flagged, &count, pattern, true).await?;

    let graphml = service.export_graphml(&annotated).await?;
    Ok((annotated, graphml))
}
