//! Download one network as GraphML

use crate::artifact::{write_artifact, ARTIFACT_EXTENSION};
use crate::error::BenchResult;
use ctxbench_service::GraphService;
use std::fmt;
use std::path::{Path, PathBuf};

/// Which network to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkSelector {
    /// By service uuid
    Uuid(String),
    /// By network name
    Name(String),
}

impl fmt::Display for NetworkSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(uuid) => write!(f, "uuid {uuid}"),
            Self::Name(name) => write!(f, "name {name}"),
        }
    }
}

/// Fetch a network and write it to `{output_dir}/{uuid}.graphml`
///
/// # Errors
/// Returns [`crate::BenchError::Provider`] if the network cannot be found
/// or exported and [`crate::BenchError::Io`] if the file cannot be written.
pub async fn fetch_network<S>(
    service: &S,
    selector: &NetworkSelector,
    output_dir: &Path,
) -> BenchResult<PathBuf>
where
    S: GraphService + ?Sized,
{
    tracing::info!("Retrieving network with {}", selector);
    let network = match selector {
        NetworkSelector::Uuid(uuid) => service.network_by_uuid(uuid).await?,
        NetworkSelector::Name(name) => service.network_by_name(name).await?,
    };
    let graphml = service.export_graphml(&network).await?;
    let file_name = format!("{}.{ARTIFACT_EXTENSION}", network.uuid);
    write_artifact(output_dir, &file_name, &graphml).await
}
