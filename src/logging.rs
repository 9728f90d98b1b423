//! Structured logging to a file.
//!
//! The terminal is owned by the UI, so log output never goes to stdout or
//! stderr. Filtering follows the `QUIZ_LOG` environment variable and
//! defaults to `info`.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "QUIZ_LOG";

/// Install a global subscriber that appends plain-text events to `path`.
pub fn init(path: &Path) -> io::Result<()> {
    let file = File::options().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(())
}
