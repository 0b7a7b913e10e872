//! Tracing subscriber setup.
//!
//! `EXPLAINATOR_LOG` takes filter directives and wins over the configured
//! level, e.g. `EXPLAINATOR_LOG=explainator::layout=debug,warn`.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "EXPLAINATOR_LOG";

/// Where log lines go. The terminal editor owns the screen, so it logs to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Calling it again is a no-op.
pub fn init(level: &str, target: &LogTarget) -> io::Result<()> {
    let builder = fmt().with_env_filter(filter(level)).with_target(false);
    // try_init only fails when a subscriber is already set, e.g. by a test harness.
    let _ = match target {
        LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    Ok(())
}
