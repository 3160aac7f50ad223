//! File logging.
//!
//! The TUI owns stderr, so `tracing` output goes to
//! `$XDG_STATE_HOME/biaslens/biaslens.log` through a non-blocking writer.
//! Filtering follows `BIASLENS_LOG` (same syntax as `RUST_LOG`).

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::state_dir;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "BIASLENS_LOG";
const DEFAULT_FILTER: &str = "biaslens=info,biaslens_core=info";
const LOG_FILE: &str = "biaslens.log";

/// Installs the global subscriber.
///
/// The returned guard flushes buffered lines on drop; keep it alive until the
/// terminal has been restored.
///
/// # Errors
///
/// Returns `Err` if the state directory cannot be created.
pub fn init_logging() -> std::io::Result<WorkerGuard> {
    let dir = state_dir();
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Ok(guard)
}
