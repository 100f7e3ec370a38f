//! Artifact naming and writing
//!
//! Every exported GraphML file carries its provenance in the file name:
//! when it was written, how long context creation took and which network
//! it holds.

use crate::error::{BenchError, BenchResult};
use chrono::{DateTime, Local, TimeZone};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Extension of every artifact
pub const ARTIFACT_EXTENSION: &str = "graphml";

/// Strip `[`, `]`, `'` and `,` from a network name and turn spaces into `-`
#[must_use]
pub fn sanitize_network_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '[' | ']' | '\'' | ','))
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

/// Render symbols the way they appear inside network names: `['A', 'B']`
#[must_use]
pub fn format_symbol_list<S: AsRef<str>>(symbols: &[S]) -> String {
    let quoted: Vec<String> = symbols.iter().map(|s| format!("'{}'", s.as_ref())).collect();
    format!("[{}]", quoted.join(", "))
}

/// Wall-clock stamp at the front of benchmark artifact names
///
/// `{epoch seconds}.{micros}-{year}-{month abbrev}-{day}-{HH-MM-SS}`, with
/// the calendar part in the zone of the given time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactTimestamp(String);

impl ArtifactTimestamp {
    /// Stamp for `time`
    #[must_use]
    pub fn from_datetime<Tz>(time: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self(format!(
            "{}.{:06}-{}",
            time.timestamp(),
            time.timestamp_subsec_micros(),
            time.format("%Y-%b-%-d-%H-%M-%S")
        ))
    }

    /// Stamp for the current local time
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    /// Stamp text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `{timestamp}-elapsed-{seconds:.4}-{sanitized name}.graphml`
#[must_use]
pub fn benchmark_artifact_name(
    timestamp: &ArtifactTimestamp,
    elapsed: Duration,
    network_name: &str,
) -> String {
    format!(
        "{}-elapsed-{:.4}-{}.{ARTIFACT_EXTENSION}",
        timestamp,
        elapsed.as_secs_f64(),
        sanitize_network_name(network_name)
    )
}

/// `size-{size}-iter-{iteration}-time-{seconds:.4}-{sanitized name}.graphml`
#[must_use]
pub fn in_order_artifact_name(
    size: usize,
    iteration: usize,
    elapsed: Duration,
    network_name: &str,
) -> String {
    format!(
        "size-{}-iter-{}-time-{:.4}-{}.{ARTIFACT_EXTENSION}",
        size,
        iteration,
        elapsed.as_secs_f64(),
        sanitize_network_name(network_name)
    )
}

/// `{sanitized name}.graphml`
#[must_use]
pub fn export_artifact_name(network_name: &str) -> String {
    format!("{}.{ARTIFACT_EXTENSION}", sanitize_network_name(network_name))
}

/// Write `contents` to `dir/file_name`, creating `dir` when missing
///
/// # Errors
/// Returns [`BenchError::Io`] naming the path that failed.
pub async fn write_artifact(dir: &Path, file_name: &str, contents: &str) -> BenchResult<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| BenchError::io(dir, e))?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, contents)
        .await
        .map_err(|e| BenchError::io(&path, e))?;
    tracing::debug!("Wrote artifact {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn sanitize_strips_list_syntax() {
        assert_eq!(
            sanitize_network_name("number-1-size-2-minS-0-maxS-2-symbols-['A', 'B']"),
            "number-1-size-2-minS-0-maxS-2-symbols-A-B"
        );
        assert_eq!(sanitize_network_name("plain"), "plain");
        assert_eq!(sanitize_network_name("a b c"), "a-b-c");
    }

    #[test]
    fn symbol_list_format() {
        assert_eq!(format_symbol_list(&["A", "B"]), "['A', 'B']");
        assert_eq!(format_symbol_list::<&str>(&[]), "[]");
    }

    #[test]
    fn timestamp_layout() {
        let time = Utc.with_ymd_and_hms(2023, 11, 6, 9, 5, 3).unwrap()
            + chrono::Duration::microseconds(42);
        let stamp = ArtifactTimestamp::from_datetime(&time);
        assert_eq!(stamp.as_str(), "1699261503.000042-2023-Nov-6-09-05-03");
    }

    #[test]
    fn timestamp_uses_local_calendar_of_zone() {
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        let time = zone.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let stamp = ArtifactTimestamp::from_datetime(&time);
        assert!(stamp.to_string().ends_with("-2024-Jan-31-23-59-59"));
    }

    #[test]
    fn benchmark_name() {
        let time = Utc.with_ymd_and_hms(2023, 11, 6, 9, 5, 3).unwrap();
        let stamp = ArtifactTimestamp::from_datetime(&time);
        let name = benchmark_artifact_name(
            &stamp,
            Duration::from_millis(1234),
            "number-1-size-1-minS-0-maxS-2-symbols-['TP53']",
        );
        assert_eq!(
            name,
            "1699261503.000000-2023-Nov-6-09-05-03-elapsed-1.2340-number-1-size-1-minS-0-maxS-2-symbols-TP53.graphml"
        );
    }

    #[test]
    fn in_order_name() {
        assert_eq!(
            in_order_artifact_name(3, 2, Duration::from_micros(500), "size-3-iter-2_['A', 'B', 'C']_0-2"),
            "size-3-iter-2-time-0.0005-size-3-iter-2_A-B-C_0-2.graphml"
        );
    }

    #[test]
    fn export_name() {
        assert_eq!(export_artifact_name("DRN_context_u_p_PPI"), "DRN_context_u_p_PPI.graphml");
    }

    #[tokio::test]
    async fn write_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("bench");

        let path = write_artifact(&nested, "a.graphml", "<graphml/>").await.unwrap();
        assert_eq!(path, nested.join("a.graphml"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<graphml/>");
    }
}
