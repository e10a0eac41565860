//! Table serialization into an in-memory output buffer.

use crate::error::{ObfuscateError, Result};
use crate::io::{self, is_enabled};
use crate::request::Format;
use crate::table::Table;
use anyhow::Context;
use bytes::Bytes;
use std::fs::{create_dir_all, write};
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Immutable encoded output with a read cursor that starts at 0.
///
/// Implements [`Read`] and [`Seek`], so it can be consumed like a file and
/// rewound to read again. [`OutputBuffer::as_bytes`] always sees the full
/// contents regardless of the cursor.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    cursor: Cursor<Bytes>,
}

impl OutputBuffer {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            cursor: Cursor::new(data.into()),
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.cursor.get_ref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.cursor.into_inner()
    }

    /// Write the full contents to `<dir>/output.<extension>`, creating `dir` if needed.
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be created.
    pub fn save(&self, dir: impl AsRef<Path>, extension: &str) -> anyhow::Result<PathBuf> {
        let dir = dir.as_ref();
        if !dir.as_os_str().is_empty() {
            create_dir_all(dir).with_context(|| format!("mkdir -p {}", dir.display()))?;
        }
        let path = dir.join(format!("output.{extension}"));
        write(&path, self.as_bytes()).with_context(|| format!("create {}", path.display()))?;
        Ok(path)
    }
}

impl Read for OutputBuffer {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for OutputBuffer {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.cursor.seek(pos)
    }
}

/// Serialize `table` as `format`.
///
/// # Errors
/// [`ObfuscateError::UnsupportedFormat`] if the format's codec is not compiled in,
/// [`ObfuscateError::Encode`] if serialization fails.
pub fn write_table(table: &Table, format: Format) -> Result<OutputBuffer> {
    if !is_enabled(format) {
        return Err(ObfuscateError::UnsupportedFormat(format.to_string()));
    }
    let data = io::encode(format, table).map_err(|source| {
        error!(%format, error = %format!("{source:#}"), "encode failed");
        ObfuscateError::Encode { format, source }
    })?;
    debug!(%format, bytes = data.len(), "encoded table");
    Ok(OutputBuffer::new(data))
}

/// [`write_table`] for a format given by its tag.
///
/// # Errors
/// [`ObfuscateError::UnsupportedFormat`] if `tag` is not `csv`, `json` or
/// `parquet`; otherwise as [`write_table`].
pub fn write_table_as(table: &Table, tag: &str) -> Result<OutputBuffer> {
    write_table(table, tag.parse()?)
}
