//! Workflows driving the graph service
//!
//! - [`benchmark`]: adaptive-size context creation benchmark
//! - [`in_order`]: every size in order, every iteration
//! - [`symbol_counts`]: symbol frequencies of exported files, annotated onto a new context
//! - [`per_file`]: one annotated context per exported file
//! - [`fetch`]: download one network as GraphML
//!
//! All workflows run sequentially: every service call is awaited before
//! the next step starts.

pub mod benchmark;
pub mod fetch;
pub mod in_order;
pub mod per_file;
pub mod symbol_counts;

use crate::error::{BenchError, BenchResult};
use ctxbench_sampling::SamplingError;
use ctxbench_service::ProviderError;
use std::path::{Path, PathBuf};

/// User the context benchmarks act as
pub const BENCHMARK_USER: &str = "contextcreationtimer";

/// Why one benchmark attempt produced no context
#[derive(Debug)]
pub(crate) enum AttemptError {
    /// A service call failed; the attempt is retried or skipped
    Service(ProviderError),
    /// The drawer rejected its input; the run stops
    Sampling(SamplingError),
}

impl From<ProviderError> for AttemptError {
    fn from(error: ProviderError) -> Self {
        Self::Service(error)
    }
}

impl From<SamplingError> for AttemptError {
    fn from(error: SamplingError) -> Self {
        Self::Sampling(error)
    }
}

/// Entry kind selected by [`list_entries`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    Dir,
    File,
}

/// Names and paths of the entries of `dir`, sorted by name
pub(crate) async fn list_entries(dir: &Path, kind: EntryKind) -> BenchResult<Vec<(String, PathBuf)>> {
    let mut reader = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| BenchError::io(dir, e))?;
    let mut entries = Vec::new();
    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(|e| BenchError::io(dir, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| BenchError::io(entry.path(), e))?;
        let wanted = match kind {
            EntryKind::Dir => file_type.is_dir(),
            EntryKind::File => file_type.is_file(),
        };
        if wanted {
            entries.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
        }
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_sorted_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("b-user")).unwrap();
        std::fs::create_dir(dir.path().join("a-user")).unwrap();
        std::fs::write(dir.path().join("z.graphml"), "").unwrap();
        std::fs::write(dir.path().join("c.txt"), "").unwrap();

        let dirs = list_entries(dir.path(), EntryKind::Dir).await.unwrap();
        let names: Vec<_> = dirs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a-user", "b-user"]);

        let files = list_entries(dir.path(), EntryKind::File).await.unwrap();
        let names: Vec<_> = files.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["c.txt", "z.graphml"]);
    }

    #[tokio::test]
    async fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_entries(&dir.path().join("nope"), EntryKind::File)
            .await
            .unwrap_err();
        assert!(matches!(err, BenchError::Io { .. }));
    }
}
