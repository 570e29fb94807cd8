//! Tracing subscriber setup
//!
//! The TUI owns the terminal, so interactive sessions log to
//! `<cache dir>/pairdiff/pairdiff.log`. Print modes log to stderr.
//! Filter with `PAIRDIFF_LOG` (default `warn`).

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const ENV_VAR: &str = "PAIRDIFF_LOG";
const DEFAULT_LEVEL: &str = "warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(ENV_VAR)
        .or_else(|_| EnvFilter::try_new(DEFAULT_LEVEL))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

pub fn log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("pairdiff").join("pairdiff.log"))
}

pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to the cache file; silently stays quiet if it cannot be opened
pub fn init_file() {
    let Some(path) = log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}
