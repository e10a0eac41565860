//! Parquet codec between raw bytes and [`Table`], powered by Arrow.
//!
//! Reading walks every record batch in file order and converts each Arrow
//! column cell to a [`Scalar`]. Writing picks one Arrow type per column from the
//! values it holds:
//!
//! | values in column           | Arrow type |
//! |----------------------------|------------|
//! | booleans (and nulls)       | `Boolean`  |
//! | integers (and nulls)       | `Int64`    |
//! | integers above `i64::MAX`  | `UInt64`   |
//! | integers/floats (and nulls)| `Float64`  |
//! | anything else, or all null | `Utf8`     |
//!
//! Every field is nullable and no index column is added.

use crate::table::{Scalar, Table};
use anyhow::{Context, Result};
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float64Array, Int64Array, StringArray, UInt64Array,
};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Float64Type, Int64Type, Schema, UInt64Type};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::sync::Arc;

/// Decode a Parquet file held in memory into a [`Table`].
///
/// # Errors
/// Returns an error if the footer/metadata is invalid, a batch fails to decode,
/// or the file's schema repeats a column name.
pub fn read_parquet_table(data: Bytes) -> Result<Table> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(data).context("open ParquetRecordBatchReader")?;
    let schema = builder.schema().clone();
    let reader = builder
        .with_batch_size(64 * 1024)
        .build()
        .context("build ParquetRecordBatchReader")?;

    let mut columns: Vec<Vec<Scalar>> = vec![Vec::new(); schema.fields().len()];
    for batch in reader {
        let batch = batch.context("read next batch")?;
        for (idx, (field, array)) in schema.fields().iter().zip(batch.columns()).enumerate() {
            let mut values = array_to_scalars(array)
                .with_context(|| format!("convert column {:?}", field.name()))?;
            columns[idx].append(&mut values);
        }
    }

    Table::from_columns(
        schema
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .zip(columns),
    )
    .context("build table from Parquet columns")
}

fn array_to_scalars(array: &ArrayRef) -> Result<Vec<Scalar>> {
    let out = match array.data_type() {
        DataType::Null => vec![Scalar::Null; array.len()],
        DataType::Boolean => array.as_boolean().iter().map(Scalar::from).collect(),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => cast(array.as_ref(), &DataType::Int64)?
            .as_primitive::<Int64Type>()
            .iter()
            .map(Scalar::from)
            .collect(),
        DataType::UInt64 => array
            .as_primitive::<UInt64Type>()
            .iter()
            .map(Scalar::from)
            .collect(),
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            cast(array.as_ref(), &DataType::Float64)?
                .as_primitive::<Float64Type>()
                .iter()
                .map(Scalar::from)
                .collect()
        }
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View | DataType::Dictionary(_, _)
            if cast_to_utf8_ok(array.data_type()) =>
        {
            cast(array.as_ref(), &DataType::Utf8)?
                .as_string::<i32>()
                .iter()
                .map(|v| Scalar::from(v.map(str::to_string)))
                .collect()
        }
        _ => {
            // dates, timestamps, decimals, nested types: keep their display text
            let options = FormatOptions::default();
            let formatter = ArrayFormatter::try_new(array.as_ref(), &options)?;
            (0..array.len())
                .map(|i| {
                    if array.is_null(i) {
                        Scalar::Null
                    } else {
                        Scalar::Str(formatter.value(i).to_string())
                    }
                })
                .collect()
        }
    };
    Ok(out)
}

fn cast_to_utf8_ok(data_type: &DataType) -> bool {
    match data_type {
        DataType::Dictionary(_, value) => matches!(
            value.as_ref(),
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
        ),
        _ => true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Bool,
    Int,
    UInt,
    Float,
    Text,
}

fn column_kind(values: &[Scalar]) -> ColumnKind {
    use ColumnKind::{Bool, Float, Int, Text, UInt};

    let mut kind: Option<ColumnKind> = None;
    let mut negative = false;
    for value in values {
        let next = match value {
            Scalar::Null => continue,
            Scalar::Bool(_) => Bool,
            Scalar::Int(i) => {
                negative |= *i < 0;
                Int
            }
            Scalar::UInt(_) => UInt,
            Scalar::Float(_) => Float,
            Scalar::Str(_) => return Text,
        };
        kind = Some(match (kind, next) {
            (None, k) => k,
            (Some(a), b) if a == b => a,
            (Some(Int | UInt), Int | UInt) => UInt,
            (Some(Int | UInt | Float), Int | UInt | Float) => Float,
            _ => return Text,
        });
    }
    match kind {
        // a negative value cannot share a UInt64 column
        Some(UInt) if negative => Float,
        Some(k) => k,
        None => Text,
    }
}

fn column_to_array(values: &[Scalar]) -> (DataType, ArrayRef) {
    match column_kind(values) {
        ColumnKind::Bool => {
            let arr: BooleanArray = values
                .iter()
                .map(|v| match v {
                    Scalar::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            (DataType::Boolean, Arc::new(arr) as ArrayRef)
        }
        ColumnKind::Int => {
            let arr: Int64Array = values
                .iter()
                .map(|v| match v {
                    Scalar::Int(i) => Some(*i),
                    _ => None,
                })
                .collect();
            (DataType::Int64, Arc::new(arr) as ArrayRef)
        }
        ColumnKind::UInt => {
            let arr: UInt64Array = values
                .iter()
                .map(|v| match v {
                    Scalar::Int(i) => u64::try_from(*i).ok(),
                    Scalar::UInt(u) => Some(*u),
                    _ => None,
                })
                .collect();
            (DataType::UInt64, Arc::new(arr) as ArrayRef)
        }
        ColumnKind::Float => {
            #[allow(clippy::cast_precision_loss)]
            let arr: Float64Array = values
                .iter()
                .map(|v| match v {
                    Scalar::Int(i) => Some(*i as f64),
                    Scalar::UInt(u) => Some(*u as f64),
                    Scalar::Float(f) => Some(*f),
                    _ => None,
                })
                .collect();
            (DataType::Float64, Arc::new(arr) as ArrayRef)
        }
        ColumnKind::Text => {
            let arr: StringArray = values
                .iter()
                .map(|v| (!v.is_null()).then(|| v.to_string()))
                .collect();
            (DataType::Utf8, Arc::new(arr) as ArrayRef)
        }
    }
}

/// Encode a [`Table`] as a single-row-group Parquet file in memory.
///
/// Works for tables without rows or columns; the result always carries the
/// Parquet magic and footer.
///
/// # Errors
/// Returns an error if the batch cannot be assembled or the writer fails.
pub fn write_parquet_table(table: &Table) -> Result<Vec<u8>> {
    let mut fields = Vec::with_capacity(table.num_columns());
    let mut arrays = Vec::with_capacity(table.num_columns());
    for column in table.columns() {
        let (data_type, array) = column_to_array(column.values());
        fields.push(Field::new(column.name(), data_type, true));
        arrays.push(array);
    }
    let schema = Arc::new(Schema::new(fields));
    let options = RecordBatchOptions::new().with_row_count(Some(table.num_rows()));
    let batch = RecordBatch::try_new_with_options(schema.clone(), arrays, &options)
        .context("assemble RecordBatch")?;

    let mut buf = Vec::new();
    {
        let props = WriterProperties::builder().build();
        let mut writer =
            ArrowWriter::try_new(&mut buf, schema, Some(props)).context("create ArrowWriter")?;
        if batch.num_columns() > 0 {
            writer.write(&batch).context("write batch to parquet")?;
        }
        writer.close().context("close ArrowWriter")?;
    }
    Ok(buf)
}
