//! Tracing setup.
//!
//! Library code only emits `tracing` events. The binary installs a subscriber
//! once at start-up with [`init_tracing`]; embedders that want the pipeline's
//! events routed elsewhere build a [`Dispatch`] and hand it to
//! [`crate::Obfuscator::with_dispatch`].

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// `RUST_LOG` wins; otherwise `level` (falling back to `info` if it does not parse).
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Build a subscriber writing to stderr, wrapped as a [`Dispatch`].
#[must_use]
pub fn build_dispatch(level: &str, format: LogFormat) -> Dispatch {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(true);
    match format {
        LogFormat::Pretty => Dispatch::new(builder.finish()),
        LogFormat::Json => Dispatch::new(builder.json().finish()),
    }
}

/// Install the process-wide subscriber.
///
/// # Errors
/// Fails if a global subscriber is already set.
pub fn init_tracing(level: &str, format: LogFormat) -> Result<()> {
    tracing::dispatcher::set_global_default(build_dispatch(level, format))
        .context("install global tracing subscriber")
}
