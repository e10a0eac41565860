//! Library and command-line configuration.

use crate::logging::LogFormat;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;

/// Scheme accepted in `file_to_obfuscate` when none is configured.
pub const DEFAULT_URI_SCHEME: &str = "s3";

/// Settings for [`crate::Obfuscator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObfuscatorConfig {
    /// Literal scheme a location must start with (`<scheme>://bucket/key`).
    pub uri_scheme: String,
}

impl Default for ObfuscatorConfig {
    fn default() -> Self {
        Self {
            uri_scheme: DEFAULT_URI_SCHEME.to_string(),
        }
    }
}

/// Usage line printed when the command line cannot be parsed.
pub const USAGE: &str = r#"Usage: obfuscator '{"file_to_obfuscate": "s3://my-bucket/file.csv", "pii_fields": ["name", "email"]}'"#;

/// Command-line arguments, each with an environment fallback.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "obfuscator",
    version,
    about = "Mask PII columns in a CSV, JSON or Parquet file from object storage"
)]
pub struct CliConfig {
    /// JSON request: {"file_to_obfuscate": "s3://bucket/key.csv", "pii_fields": [...]}
    pub request: String,

    /// Directory that receives output.<ext>.
    #[arg(short, long, env = "OBFUSCATOR_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Root directory of the local object store; buckets are its subdirectories.
    #[arg(long, env = "OBFUSCATOR_STORAGE_ROOT", default_value = ".")]
    pub storage_root: PathBuf,

    /// URI scheme accepted in file_to_obfuscate.
    #[arg(long, env = "OBFUSCATOR_URI_SCHEME", default_value = DEFAULT_URI_SCHEME)]
    pub scheme: String,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(short, long, env = "OBFUSCATOR_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, env = "OBFUSCATOR_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Write the processed bytes to standard output instead of a file.
    #[arg(long)]
    pub stdout: bool,
}

impl CliConfig {
    /// Parse from an argument list (including the program name).
    ///
    /// # Errors
    /// Returns the `clap` error for missing, extra or malformed arguments, and for
    /// `--help` / `--version`.
    pub fn from_cli<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    #[must_use]
    pub fn obfuscator_config(&self) -> ObfuscatorConfig {
        ObfuscatorConfig {
            uri_scheme: self.scheme.clone(),
        }
    }
}
