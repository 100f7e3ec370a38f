//! Configuration for ctxbench runs
//!
//! One file (TOML or YAML, chosen by extension) holds every section. Missing
//! sections and fields take their defaults.
//!
//! ```toml
//! [server]
//! host = "sbml4j"
//! port = 8080
//! application_context = "sbml4j"
//!
//! [network]
//! base_name = "PPI-base"
//!
//! [loop]
//! iterations = 100
//! max_size = 20
//! combinations = ["0-2", "1-3"]
//! ```

use crate::error::{BenchError, BenchResult};
use ctxbench_graphml::TypeDeclarations;
use ctxbench_service::ServiceEndpoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Graph service connection
    pub server: ServerConfig,
    /// Input and output locations
    pub data: DataConfig,
    /// Random number generation
    pub random: RandomConfig,
    /// Base network selection
    pub network: NetworkConfig,
    /// Benchmark loop parameters
    #[serde(rename = "loop")]
    pub run: LoopConfig,
    /// Annotation names and node properties
    pub annotation: AnnotationConfig,
    /// Log output
    pub logging: LoggingConfig,
}

impl BenchConfig {
    /// Load and validate a configuration file
    ///
    /// `.toml` files are read as TOML, `.yaml`/`.yml` as YAML.
    ///
    /// # Errors
    /// Returns [`BenchError::Io`] if the file cannot be read and
    /// [`BenchError::Config`] if it cannot be parsed or fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> BenchResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| BenchError::io(path, e))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            _ => Err(BenchError::config(format!(
                "unsupported config format: {}",
                path.display()
            ))),
        }
    }

    /// Parse and validate TOML text
    ///
    /// # Errors
    /// Returns [`BenchError::Config`] on parse or validation failure.
    pub fn from_toml_str(text: &str) -> BenchResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| BenchError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate YAML text
    ///
    /// # Errors
    /// Returns [`BenchError::Config`] on parse or validation failure.
    pub fn from_yaml_str(text: &str) -> BenchResult<Self> {
        let config: Self =
            serde_yaml::from_str(text).map_err(|e| BenchError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    /// Returns [`BenchError::Config`] naming the first violated constraint.
    pub fn validate(&self) -> BenchResult<()> {
        if self.run.iterations == 0 {
            return Err(BenchError::config("loop.iterations must be at least 1"));
        }
        if self.run.max_size == 0 {
            return Err(BenchError::config("loop.max_size must be at least 1"));
        }
        if self.run.max_consecutive_failures == 0 {
            return Err(BenchError::config(
                "loop.max_consecutive_failures must be at least 1",
            ));
        }
        self.run.size_bounds()?;
        self.run.in_order_bounds()?;
        if self.annotation.node_properties.len() != self.annotation.node_property_types.len() {
            return Err(BenchError::config(format!(
                "annotation.node_properties has {} entries but annotation.node_property_types has {}",
                self.annotation.node_properties.len(),
                self.annotation.node_property_types.len()
            )));
        }
        Ok(())
    }
}

/// Graph service connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host, `http://` is added when no scheme is given
    pub host: String,
    /// TCP port
    pub port: u16,
    /// REST application path
    pub application_context: String,
    /// User for workflows without a fixed user
    pub user: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let endpoint = ServiceEndpoint::default();
        Self {
            host: endpoint.host,
            port: endpoint.port,
            application_context: endpoint.application_context,
            user: None,
            timeout_secs: endpoint.timeout_secs,
        }
    }
}

impl ServerConfig {
    /// Endpoint for the HTTP adapter
    #[must_use]
    pub fn endpoint(&self) -> ServiceEndpoint {
        ServiceEndpoint {
            host: self.host.clone(),
            port: self.port,
            application_context: self.application_context.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

/// Input and output locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Where artifacts are written
    pub output_dir: PathBuf,
    /// Where previously exported GraphML files are read from
    pub graphml_dir: PathBuf,
    /// File name patterns for symbol count batches
    pub file_patterns: Vec<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("/output"),
            graphml_dir: PathBuf::from("/graphml"),
            file_patterns: Vec::new(),
        }
    }
}

/// Random number generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    /// Seed of the run's RNG
    pub seed: u64,
}

/// Base network selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Name of the network contexts are drawn from
    pub base_name: String,
}

/// Benchmark loop parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Successful iterations per combination
    pub iterations: usize,
    /// Largest symbol set size
    pub max_size: usize,
    /// Context size bounds as `"min-max"`
    pub combinations: Vec<String>,
    /// Consecutive failed attempts before a run aborts
    pub max_consecutive_failures: usize,
    /// Context size bounds of the in-order benchmark
    pub in_order_bounds: String,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            max_size: 10,
            combinations: vec!["0-2".to_string()],
            max_consecutive_failures: 50,
            in_order_bounds: "0-2".to_string(),
        }
    }
}

impl LoopConfig {
    /// Parsed combinations
    ///
    /// # Errors
    /// Returns [`BenchError::Config`] for an entry that is not `"min-max"`.
    pub fn size_bounds(&self) -> BenchResult<Vec<SizeBounds>> {
        self.combinations.iter().map(|c| c.parse()).collect()
    }

    /// Parsed in-order bounds
    ///
    /// # Errors
    /// Returns [`BenchError::Config`] if the value is not `"min-max"`.
    pub fn in_order_bounds(&self) -> BenchResult<SizeBounds> {
        self.in_order_bounds.parse()
    }
}

/// Minimum and maximum path length of a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeBounds {
    /// Minimum size
    pub min: u32,
    /// Maximum size
    pub max: u32,
}

impl SizeBounds {
    /// Create bounds
    #[inline]
    #[must_use]
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

impl FromStr for SizeBounds {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BenchError::config(format!("invalid size bounds '{s}', expected 'min-max'"));
        let (min, max) = s.trim().split_once('-').ok_or_else(invalid)?;
        let min = min.trim().parse().map_err(|_| invalid())?;
        let max = max.trim().parse().map_err(|_| invalid())?;
        Ok(Self { min, max })
    }
}

impl fmt::Display for SizeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Annotation names and node properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Suffix of the per-file presence annotation
    pub type_name: String,
    /// Node properties copied into per-file annotations
    pub node_properties: Vec<String>,
    /// Declared type of each node property, same order
    pub node_property_types: Vec<String>,
    /// Presence annotation name of symbol count batches
    pub presence_name: String,
    /// Target network name of the presence annotation
    pub presence_target: String,
    /// Count annotation name of symbol count batches
    pub count_name: String,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            type_name: "DeRegNet".to_string(),
            node_properties: Vec::new(),
            node_property_types: Vec::new(),
            presence_name: "DeRegNet_Node".to_string(),
            presence_target: "DRN".to_string(),
            count_name: "DeRegNet_Count".to_string(),
        }
    }
}

impl AnnotationConfig {
    /// Node property types as extractor declarations
    #[must_use]
    pub fn type_declarations(&self) -> TypeDeclarations {
        TypeDeclarations::from_lists(&self.node_properties, &self.node_property_types)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Log output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxbench_graphml::DeclaredType;
    use pretty_assertions::assert_eq;

    const FULL_TOML: &str = r#"
[server]
host = "sbml4j"
port = 8081
application_context = "sbml4j"
user = "analyst"

[data]
output_dir = "/tmp/out"
graphml_dir = "/tmp/graphml"
file_patterns = ["run1", "run2"]

[random]
seed = 7

[network]
base_name = "PPI-base"

[loop]
iterations = 100
max_size = 20
combinations = ["0-2", "1-3"]

[annotation]
type_name = "DeRegNet"
node_properties = ["score", "regulation"]
node_property_types = ["double", "string"]

[logging]
level = "debug"
format = "json"
"#;

    #[test]
    fn parses_full_toml() {
        let config = BenchConfig::from_toml_str(FULL_TOML).unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.user.as_deref(), Some("analyst"));
        assert_eq!(config.data.file_patterns, vec!["run1", "run2"]);
        assert_eq!(config.random.seed, 7);
        assert_eq!(config.network.base_name, "PPI-base");
        assert_eq!(config.run.iterations, 100);
        assert_eq!(
            config.run.size_bounds().unwrap(),
            vec![SizeBounds::new(0, 2), SizeBounds::new(1, 3)]
        );
        assert_eq!(config.logging.format, LogFormat::Json);
        // untouched fields keep defaults
        assert_eq!(config.run.max_consecutive_failures, 50);
        assert_eq!(config.annotation.presence_target, "DRN");
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = BenchConfig::from_toml_str("").unwrap();
        assert_eq!(config, BenchConfig::default());
        assert_eq!(config.run.in_order_bounds().unwrap(), SizeBounds::new(0, 2));
        assert_eq!(config.server.endpoint().base_url(), "http://localhost:8080/sbml4j");
    }

    #[test]
    fn parses_yaml() {
        let config = BenchConfig::from_yaml_str(
            "network:\n  base_name: base\nloop:\n  iterations: 3\n  max_size: 4\n",
        )
        .unwrap();
        assert_eq!(config.network.base_name, "base");
        assert_eq!(config.run.iterations, 3);
        assert_eq!(config.run.max_size, 4);
    }

    #[test]
    fn rejects_bad_combination() {
        let err = BenchConfig::from_toml_str("[loop]\ncombinations = [\"0to2\"]").unwrap_err();
        assert!(matches!(err, BenchError::Config(msg) if msg.contains("0to2")));
    }

    #[test]
    fn rejects_zero_iterations() {
        assert!(BenchConfig::from_toml_str("[loop]\niterations = 0").is_err());
        assert!(BenchConfig::from_toml_str("[loop]\nmax_size = 0").is_err());
    }

    #[test]
    fn rejects_unaligned_property_types() {
        let err = BenchConfig::from_toml_str(
            "[annotation]\nnode_properties = [\"a\", \"b\"]\nnode_property_types = [\"double\"]",
        )
        .unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
    }

    #[test]
    fn size_bounds_roundtrip_text() {
        let bounds: SizeBounds = " 1 - 3 ".parse().unwrap();
        assert_eq!(bounds, SizeBounds::new(1, 3));
        assert_eq!(bounds.to_string(), "1-3");
        assert!("3".parse::<SizeBounds>().is_err());
        assert!("a-b".parse::<SizeBounds>().is_err());
    }

    #[test]
    fn type_declarations_follow_lists() {
        let config = BenchConfig::from_toml_str(FULL_TOML).unwrap();
        let types = config.annotation.type_declarations();
        assert_eq!(types.type_of("score"), DeclaredType::Float);
        assert_eq!(types.type_of("regulation"), DeclaredType::Text);
    }

    #[test]
    fn from_file_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("config.toml");
        std::fs::write(&toml_path, FULL_TOML).unwrap();
        assert_eq!(BenchConfig::from_file(&toml_path).unwrap().random.seed, 7);

        let yaml_path = dir.path().join("config.yml");
        std::fs::write(&yaml_path, "random:\n  seed: 9\n").unwrap();
        assert_eq!(BenchConfig::from_file(&yaml_path).unwrap().random.seed, 9);

        let ini_path = dir.path().join("config.ini");
        std::fs::write(&ini_path, "[random]\nseed=1\n").unwrap();
        assert!(matches!(
            BenchConfig::from_file(&ini_path),
            Err(BenchError::Config(_))
        ));

        assert!(matches!(
            BenchConfig::from_file(dir.path().join("missing.toml")),
            Err(BenchError::Io { .. })
        ));
    }
}
