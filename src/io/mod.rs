//! Format codecs and storage access.
//!
//! Each format lives in its own module behind a Cargo feature; [`decode`] and
//! [`encode`] dispatch on [`Format`]. A format whose feature is compiled out is
//! reported as [`Unavailable`].

use crate::request::Format;
use crate::table::Table;
use anyhow::Result;
use std::fmt;

pub mod cloud;

#[cfg_attr(docsrs, doc(cfg(feature = "io-jsonl")))]
#[cfg(feature = "io-jsonl")]
pub mod jsonl;

#[cfg_attr(docsrs, doc(cfg(feature = "io-csv")))]
#[cfg(feature = "io-csv")]
pub mod csv;

#[cfg_attr(docsrs, doc(cfg(feature = "io-parquet")))]
#[cfg(feature = "io-parquet")]
pub mod parquet;

/// The codec for a format was not compiled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unavailable(pub Format);

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} support is not enabled in this build", self.0)
    }
}

impl std::error::Error for Unavailable {}

/// Decode raw object bytes as `format`.
///
/// # Errors
/// Propagates the codec's parse error, or [`Unavailable`] when the format's
/// feature is disabled.
pub fn decode(format: Format, data: Vec<u8>) -> Result<Table> {
    match format {
        #[cfg(feature = "io-csv")]
        Format::Csv => csv::read_csv_table(&data),
        #[cfg(feature = "io-jsonl")]
        Format::Json => jsonl::read_json_table(&data),
        #[cfg(feature = "io-parquet")]
        Format::Parquet => parquet::read_parquet_table(bytes::Bytes::from(data)),
        #[allow(unreachable_patterns)]
        other => Err(Unavailable(other).into()),
    }
}

/// Encode `table` as `format`.
///
/// # Errors
/// Propagates the codec's write error, or [`Unavailable`] when the format's
/// feature is disabled.
pub fn encode(format: Format, table: &Table) -> Result<Vec<u8>> {
    match format {
        #[cfg(feature = "io-csv")]
        Format::Csv => csv::write_csv_table(table),
        #[cfg(feature = "io-jsonl")]
        Format::Json => jsonl::write_json_table(table),
        #[cfg(feature = "io-parquet")]
        Format::Parquet => parquet::write_parquet_table(table),
        #[allow(unreachable_patterns)]
        other => Err(Unavailable(other).into()),
    }
}

/// Whether this build can read and write `format`.
#[must_use]
pub const fn is_enabled(format: Format) -> bool {
    match format {
        Format::Csv => cfg!(feature = "io-csv"),
        Format::Json => cfg!(feature = "io-jsonl"),
        Format::Parquet => cfg!(feature = "io-parquet"),
    }
}
