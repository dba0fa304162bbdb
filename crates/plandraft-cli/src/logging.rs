use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Initialize stderr logging with an env-filter (`RUST_LOG`), defaulting to
/// `info`.
pub fn init_logging() -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|err| err.to_string())
}
