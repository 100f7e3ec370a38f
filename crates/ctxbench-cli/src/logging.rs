//! Tracing subscriber setup

use ctxbench_core::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level. HTTP client internals are kept
/// at `warn`. Logs go to stderr so reports on stdout stay parseable.
pub(crate) fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))?
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
    .map_err(anyhow::Error::msg)
}
