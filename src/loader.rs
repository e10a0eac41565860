//! Table loading: fetch an object from storage and decode it.

use crate::error::{ObfuscateError, Result};
use crate::io::cloud::ObjectIO;
use crate::io::{self, is_enabled};
use crate::request::{Format, Location};
use crate::table::Table;
use tracing::{debug, error, warn};

/// Fetch `bucket/key` and decode it as `format`.
///
/// A zero-byte object, or one the decoder finds no data in, yields an empty
/// [`Table`] rather than an error.
///
/// # Errors
/// - [`ObfuscateError::UnsupportedFormat`] if the format's codec is not compiled in
///   (checked before any I/O)
/// - [`ObfuscateError::NotFound`] if the object does not exist
/// - [`ObfuscateError::Storage`] for any other storage failure
/// - [`ObfuscateError::Decode`] if the bytes are not valid `format`
pub fn load_table<O>(storage: &O, bucket: &str, key: &str, format: Format) -> Result<Table>
where
    O: ObjectIO + ?Sized,
{
    if !is_enabled(format) {
        return Err(ObfuscateError::UnsupportedFormat(format.to_string()));
    }

    let data = storage.get_object(bucket, key).map_err(|e| {
        if e.is_not_found() {
            error!(bucket, key, "file not found");
            ObfuscateError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }
        } else {
            error!(bucket, key, error = %e, "storage client error");
            ObfuscateError::Storage {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source: e,
            }
        }
    })?;
    debug!(bucket, key, bytes = data.len(), "fetched object");

    if data.is_empty() {
        warn!(bucket, key, %format, "empty {format} file");
        return Ok(Table::empty());
    }

    let table = io::decode(format, data).map_err(|source| {
        error!(bucket, key, %format, error = %format!("{source:#}"), "decode failed");
        ObfuscateError::Decode { format, source }
    })?;
    if table.num_columns() == 0 {
        warn!(bucket, key, %format, "no data in {format} file");
    }
    debug!(rows = table.num_rows(), columns = table.num_columns(), "decoded table");
    Ok(table)
}

/// [`load_table`] for a parsed [`Location`].
///
/// # Errors
/// See [`load_table`].
pub fn load_location<O>(storage: &O, location: &Location) -> Result<Table>
where
    O: ObjectIO + ?Sized,
{
    load_table(storage, &location.bucket, &location.key, location.format)
}
