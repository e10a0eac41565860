//! CSV codec between raw bytes and [`Table`].
//!
//! - The first record is the header and defines column names in order.
//! - Cells are typed with [`Scalar::infer`], which never changes how a cell
//!   re-renders, so unmasked columns come back byte-for-byte.
//! - Input with no header record (empty or blank) decodes to an empty table.

use crate::table::{Scalar, Table};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};

/// Decode CSV bytes into a [`Table`].
///
/// # Errors
/// Returns an error if a record cannot be read (invalid UTF-8, malformed
/// quoting), a data record's width differs from the header, or the header repeats
/// a column name.
pub fn read_csv_table(data: &[u8]) -> Result<Table> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(data);
    let names: Vec<String> = rdr
        .headers()
        .context("read CSV header")?
        .iter()
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        return Ok(Table::empty());
    }

    let mut rows = Vec::new();
    for (i, rec) in rdr.records().enumerate() {
        let rec = rec.with_context(|| format!("parse CSV record #{}", i + 1))?;
        rows.push(rec.iter().map(Scalar::infer).collect::<Vec<_>>());
    }
    Table::from_rows(names, rows).context("build table from CSV records")
}

/// Encode a [`Table`] as CSV: header row, then one record per row, no index.
///
/// A table without columns encodes as a single blank line.
///
/// # Errors
/// Returns an error if a record fails to write or flush.
pub fn write_csv_table(table: &Table) -> Result<Vec<u8>> {
    if table.num_columns() == 0 {
        return Ok(b"\n".to_vec());
    }
    let mut buf = Vec::with_capacity(table.num_rows().saturating_mul(32));
    {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(&mut buf);
        wtr.write_record(table.column_names())
            .context("write CSV header")?;
        for (i, row) in table.rows().enumerate() {
            wtr.write_record(row.values().map(ToString::to_string))
                .with_context(|| format!("write CSV row #{}", i + 1))?;
        }
        wtr.flush()?;
    }
    Ok(buf)
}
