//! JSON codec between raw bytes and [`Table`].
//!
//! Reading accepts either representation of a record set:
//! - a single top-level array of objects (`[{...}, {...}]`), or
//! - newline-delimited objects (JSONL); empty/whitespace-only lines are skipped.
//!
//! Writing always produces JSONL: one compact object per line, keys in column order.
//!
//! # Notes
//! - Columns are the union of record keys in first-seen order; a record missing
//!   a key gets null in that column.
//! - Nested arrays/objects are kept as their compact JSON text.

use crate::table::{Scalar, Table};
use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use std::io::Write;

/// Decode JSON or JSONL bytes into a [`Table`].
///
/// Whitespace-only input and an empty array both decode to an empty table.
///
/// # Errors
/// Returns an error if the input is not UTF-8, a line/document fails to parse, or
/// a record is not a JSON object.
pub fn read_json_table(data: &[u8]) -> Result<Table> {
    let text = std::str::from_utf8(data).context("JSON input is not valid UTF-8")?;
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return Ok(Table::empty());
    }

    let records: Vec<Map<String, Value>> = if trimmed.starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(text).context("parse JSON array")?;
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| into_record(v).with_context(|| format!("JSON record #{}", i + 1)))
            .collect::<Result<_>>()?
    } else {
        let mut out = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let v: Value = serde_json::from_str(line)
                .with_context(|| format!("parse JSONL line {}: {}", i + 1, line))?;
            out.push(into_record(v).with_context(|| format!("JSONL line {}", i + 1))?);
        }
        out
    };

    records_to_table(records)
}

fn into_record(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("expected a JSON object, found {}", kind_name(&other)),
    }
}

const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn to_scalar(value: Value) -> Scalar {
    match value {
        Value::Null => Scalar::Null,
        Value::Bool(b) => Scalar::Bool(b),
        Value::Number(n) => n
            .as_i64()
            .map(Scalar::Int)
            .or_else(|| n.as_u64().map(Scalar::UInt))
            .or_else(|| n.as_f64().map(Scalar::Float))
            .unwrap_or_else(|| Scalar::Str(n.to_string())),
        Value::String(s) => Scalar::Str(s),
        nested @ (Value::Array(_) | Value::Object(_)) => Scalar::Str(nested.to_string()),
    }
}

fn records_to_table(records: Vec<Map<String, Value>>) -> Result<Table> {
    let mut names: Vec<String> = Vec::new();
    let mut columns: Vec<Vec<Scalar>> = Vec::new();
    let num_rows = records.len();

    for (row, record) in records.into_iter().enumerate() {
        for (key, value) in record {
            let idx = match names.iter().position(|n| *n == key) {
                Some(idx) => idx,
                None => {
                    names.push(key);
                    columns.push(vec![Scalar::Null; row]);
                    names.len() - 1
                }
            };
            columns[idx].push(to_scalar(value));
        }
        // backfill keys this record did not mention
        for col in &mut columns {
            if col.len() == row {
                col.push(Scalar::Null);
            }
        }
    }
    debug_assert!(columns.iter().all(|c| c.len() == num_rows));
    if names.is_empty() {
        return Ok(Table::without_columns(num_rows));
    }

    Table::from_columns(names.into_iter().zip(columns)).context("build table from JSON records")
}

/// Encode a [`Table`] as JSONL.
///
/// A table without rows encodes as `[]\n` so the output is never empty. JSON
/// Lines has no header, so such a table reads back without its columns.
///
/// # Errors
/// Returns an error if a row fails to serialize.
pub fn write_json_table(table: &Table) -> Result<Vec<u8>> {
    if table.is_empty() {
        return Ok(b"[]\n".to_vec());
    }
    let mut w = Vec::with_capacity(table.num_rows().saturating_mul(64));
    for (i, row) in table.rows().enumerate() {
        serde_json::to_writer(&mut w, &row)
            .with_context(|| format!("serialize row #{}", i + 1))?;
        w.write_all(b"\n")?;
    }
    Ok(w)
}
