use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Where log records go when no log file was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Stderr,
    /// The full-screen interface owns the terminal.
    Silent,
}

/// Installs the global subscriber. Keep the returned guard alive until exit
/// so buffered records get flushed.
pub fn init(log_file: Option<&Path>, debug: bool, fallback: Fallback) -> Result<Option<WorkerGuard>> {
    let default_filter = if debug { "padcalc=debug" } else { "padcalc=warn" };

    // use RUST_LOG env var, defaulting based on debug flag.
    let env_filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let (writer, guard) = match (log_file, fallback) {
        (Some(path), _) => {
            let mut log_file_opts = OpenOptions::new();
            log_file_opts.create(true).append(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::OpenOptionsExt;
                log_file_opts.mode(0o600);
            }
            let file = log_file_opts
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            non_blocking(file)
        }
        (None, Fallback::Stderr) => non_blocking(io::stderr()),
        (None, Fallback::Silent) => return Ok(None),
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .with_ansi(log_file.is_none())
        .with_filter(env_filter());

    let _ = tracing_subscriber::registry().with(layer).try_init();
    Ok(Some(guard))
}
