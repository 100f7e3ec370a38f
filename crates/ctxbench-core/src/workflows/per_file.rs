//! One annotated network per exported GraphML file
//!
//! For each file in `graphml_dir`, a context of the file's symbols is created
//! from the base network and annotated with a presence flag plus one
//! annotation per configured node property. The file name up to its first
//! `.` prefixes every name. Any failure skips the file.

use crate::artifact::{export_artifact_name, write_artifact};
use crate::config::BenchConfig;
use crate::error::{BenchError, BenchResult};
use crate::workflows::{list_entries, EntryKind};
use ctxbench_graphml::{
    build_key_mapping, build_node_attribute_maps, build_node_symbol_map, presence_annotation,
    symbol_attribute_values, value_annotation, GraphmlDocument, TypeDeclarations,
};
use ctxbench_service::{ContextRequest, GraphService};
use std::path::{Path, PathBuf};

/// Parameters of a per-file run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerFileSettings {
    /// Network contexts are created from
    pub base_name: String,
    /// Input folder
    pub graphml_dir: PathBuf,
    /// Export directory
    pub output_dir: PathBuf,
    /// Suffix of the presence annotation and its target network name
    pub type_name: String,
    /// Node properties to annotate, in order
    pub node_properties: Vec<String>,
    /// Declared types of the node properties
    pub types: TypeDeclarations,
}

impl PerFileSettings {
    /// Settings from a loaded configuration
    #[must_use]
    pub fn from_config(config: &BenchConfig) -> Self {
        Self {
            base_name: config.network.base_name.clone(),
            graphml_dir: config.data.graphml_dir.clone(),
            output_dir: config.data.output_dir.clone(),
            type_name: config.annotation.type_name.clone(),
            node_properties: config.annotation.node_properties.clone(),
            types: config.annotation.type_declarations(),
        }
    }
}

/// How one file ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Annotated network written to this path
    Exported(PathBuf),
    /// Skipped for the given reason
    Skipped(String),
}

/// Outcome of one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Input file name
    pub file: String,
    /// Name prefix derived from the file name
    pub prefix: String,
    /// How the file ended
    pub outcome: FileOutcome,
}

/// Name prefix of an input file: everything before the first `.`
#[must_use]
pub fn file_prefix(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

/// Create and export one annotated network per file
///
/// # Errors
/// Returns [`BenchError::Io`] only if `graphml_dir` cannot be listed.
pub async fn run_network_per_file<S>(
    service: &S,
    settings: &PerFileSettings,
) -> BenchResult<Vec<FileReport>>
where
    S: GraphService + ?Sized,
{
    let mut reports = Vec::new();
    for (file, path) in list_entries(&settings.graphml_dir, EntryKind::File).await? {
        let prefix = file_prefix(&file).to_string();
        tracing::debug!("Processing file {}", path.display());

        let outcome = match process_file(service, settings, &path, &prefix).await {
            Ok(exported) => FileOutcome::Exported(exported),
            Err(e) => {
                tracing::warn!(
                    "Unable to create a network and/or graphml for input {}: {}",
                    file,
                    e
                );
                FileOutcome::Skipped(e.to_string())
            }
        };
        reports.push(FileReport {
            file,
            prefix,
            outcome,
        });
    }
    Ok(reports)
}

async fn process_file<S>(
    service: &S,
    settings: &PerFileSettings,
    path: &Path,
    prefix: &str,
) -> BenchResult<PathBuf>
where
    S: GraphService + ?Sized,
{
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| BenchError::io(path, e))?;
    let doc = GraphmlDocument::parse(&text)?;
    let keys = build_key_mapping(&doc)?;
    let symbols: Vec<String> = build_node_symbol_map(&doc, &keys)?
        .into_values()
        .collect();
    let node_maps = build_node_attribute_maps(&doc, &keys, &settings.types)?;

    let base = service.network_by_name(&settings.base_name).await?;
    let request = ContextRequest {
        symbols: symbols.clone(),
        network_name: format!("{}_{}", prefix, base.mapping_type),
        min_size: 0,
        max_size: 0,
    };
    let context = service.create_context(&base, &request).await?;

    let presence = presence_annotation(&format!("{}_{}", prefix, settings.type_name), &symbols);
    let mut annotated = service
        .annotate(&context, &presence, &settings.type_name, true)
        .await?;

    for property in &settings.node_properties {
        let values = symbol_attribute_values(&node_maps, property)?;
        let payload = value_annotation(&format!("{prefix}_{property}"), &symbols, &values)?;
        annotated = service.annotate(&annotated, &payload, property, true).await?;
    }

    let graphml = service.export_graphml(&annotated).await?;
    write_artifact(&settings.output_dir, &export_artifact_name(&annotated.name), &graphml).await
}
