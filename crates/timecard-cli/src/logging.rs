use crate::args::LogLevel;
use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber. `RUST_LOG` takes precedence over
/// `--log-level`; stdout is left to the table.
pub fn init(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("timecard={level},timecard_core={level}")));

    // A subscriber may already be installed (tests run in one process).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
