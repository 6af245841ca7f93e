//! Logging configuration.
//!
//! Logs go to stderr by default. With a log directory they go to a daily
//! rolling file there instead.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system.
///
/// Log level can be controlled via the `PICASA_EMBED_LOG` environment variable:
/// - `PICASA_EMBED_LOG=debug` for the commands being run and face rectangles
/// - `PICASA_EMBED_LOG=info` for standard output (default)
/// - `PICASA_EMBED_LOG=warn` for warnings only
///
/// `verbose` raises the default to `debug` when the variable is unset.
pub fn init(verbose: bool, log_dir: Option<PathBuf>) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_env("PICASA_EMBED_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let Some(log_dir) = log_dir else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init()?;
        return Ok(());
    };

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "picasa-embed.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes on drop, keep it for the life of the process
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()?;

    tracing::info!("Logging initialized with file backend at {:?}", log_dir);
    Ok(())
}
