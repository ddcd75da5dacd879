//! Console and per-run log file output.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file written into each working directory.
pub const LOG_FILE: &str = "log.txt";

const VERBOSE_FILTER: &str = "info,bulletin=debug,bulletin_pipeline=debug,bulletin_models=debug,bulletin_storage=debug,bulletin_rate_limit=debug";

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { VERBOSE_FILTER } else { "info" }
}

/// Logs to the console and appends to `<working_dir>/log.txt`.
///
/// `RUST_LOG` takes precedence over `verbose`. Keep the returned guard alive
/// for the whole run; dropping it flushes the file.
pub fn init_logging(working_dir: &Path, verbose: bool) -> WorkerGuard {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(working_dir, LOG_FILE));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    guard
}
