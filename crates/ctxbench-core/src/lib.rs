//! ctxbench Core
//!
//! Configuration, artifact naming and the workflows that drive the graph
//! service:
//! - Adaptive benchmark of context creation latency
//! - In-order benchmark over every size
//! - Symbol count annotation of previously exported networks
//! - One annotated network per exported file
//! - Single network download
//!
//! # Example
//!
//! ```rust,ignore
//! use ctxbench_core::{BenchConfig, workflows::benchmark::{run_benchmark, BenchmarkSettings}};
//! use ctxbench_service::{GraphServiceFactory, HttpServiceFactory};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BenchConfig::from_file("/config/config.toml")?;
//! let service = HttpServiceFactory::new(config.server.endpoint()).connect(Some("contextcreationtimer"))?;
//! let mut rng = StdRng::seed_from_u64(config.random.seed);
//!
//! let report = run_benchmark(&service, &BenchmarkSettings::from_config(&config)?, &mut rng).await?;
//! println!("{} contexts created", report.total_successes());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod artifact;
pub mod config;
pub mod error;
pub mod workflows;

pub use config::{
    AnnotationConfig, BenchConfig, DataConfig, LogFormat, LoggingConfig, LoopConfig,
    NetworkConfig, RandomConfig, ServerConfig, SizeBounds,
};
pub use error::{BenchError, BenchResult};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running workflows
    pub use crate::workflows::benchmark::{run_benchmark, BenchmarkReport, BenchmarkSettings};
    pub use crate::workflows::fetch::{fetch_network, NetworkSelector};
    pub use crate::workflows::in_order::{run_in_order, InOrderReport, InOrderSettings};
    pub use crate::workflows::per_file::{run_network_per_file, FileOutcome, PerFileSettings};
    pub use crate::workflows::symbol_counts::{
        run_symbol_counts, BatchOutcome, BatchReport, SymbolCountSettings,
    };
    pub use crate::workflows::BENCHMARK_USER;
    pub use crate::{BenchConfig, BenchError, BenchResult};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
