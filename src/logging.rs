// src/logging.rs
use std::fs::OpenOptions;
use std::path::Path;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

pub const LOG_FILE: &str = "Tally.log";

/// Where log lines go.
pub enum LogTarget<'a> {
    /// Batch runs: stderr.
    Stderr,
    /// Interactive viewer: append to a file so the terminal stays clean.
    File(&'a Path),
}

/// RUST_LOG wins over the default level.
fn make_filter(default_level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("{default_level}")))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(target: LogTarget<'_>, verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let layer = match target {
        LogTarget::Stderr => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .with_filter(make_filter(level))
            .boxed(),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_filter(make_filter(level))
                .boxed()
        }
    };

    let _ = Registry::default().with(layer).try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_target_creates_the_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        init_logging(LogTarget::File(&path), true).unwrap();
        tracing::info!("logging initialized");
        assert!(path.exists());
    }
}
