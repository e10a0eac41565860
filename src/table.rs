//! Column-oriented in-memory table.
//!
//! A [`Table`] is an ordered list of uniquely named [`Column`]s, each holding a
//! sequence of [`Scalar`] values. Every column has the same length; the
//! constructors enforce this so the rest of the crate can index rows freely.

use anyhow::{Result, bail, ensure};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::fmt;

/// A single cell value. Columns may mix variants freely.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    /// Integer above `i64::MAX`. Use [`Scalar::from`] on a `u64` to pick the right variant.
    UInt(u64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Type a text cell without losing information.
    ///
    /// Empty text is null; `true`/`false` are booleans; integer and float text
    /// become numbers only when rendering the number gives back the exact same
    /// text. Everything else (`007`, `1e3`, `+5`, `True`) stays a string.
    #[must_use]
    pub fn infer(text: &str) -> Self {
        match text {
            "" => return Self::Null,
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        if let Ok(i) = text.parse::<i64>()
            && i.to_string() == text
        {
            return Self::Int(i);
        }
        if let Ok(u) = text.parse::<u64>()
            && u.to_string() == text
        {
            return Self::UInt(u);
        }
        if let Ok(f) = text.parse::<f64>()
            && f.is_finite()
            && format_float(f) == text
        {
            return Self::Float(f);
        }
        Self::Str(text.to_string())
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Render a float so that whole numbers keep a trailing `.0`.
#[must_use]
pub fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}

/// Text rendering used by CSV and by string-typed Parquet columns. Null renders empty.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => f.write_str(&format_float(*x)),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<u64> for Scalar {
    fn from(u: u64) -> Self {
        i64::try_from(u).map_or(Self::UInt(u), Self::Int)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<Self>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Scalar>,
}

impl Column {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    /// Cells can be rewritten but not added or removed.
    pub fn values_mut(&mut self) -> &mut [Scalar] {
        &mut self.values
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Table {
    /// Zero columns, zero rows.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// `num_rows` rows that carry no columns, as decoded from key-less records.
    #[must_use]
    pub fn without_columns(num_rows: usize) -> Self {
        Self {
            columns: Vec::new(),
            num_rows,
        }
    }

    /// Build a table from `(name, values)` pairs in declaration order.
    ///
    /// # Errors
    /// Fails on a duplicate column name or a column whose length differs from the first.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Scalar>)>,
        S: Into<String>,
    {
        let mut table = Self::empty();
        for (name, values) in columns {
            table.push_column(name, values)?;
        }
        Ok(table)
    }

    /// Build a table from a header and row-major records.
    ///
    /// # Errors
    /// Fails on a duplicate header name or a record whose width differs from the header.
    pub fn from_rows<I>(names: Vec<String>, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<Scalar>>,
    {
        let mut columns: Vec<Vec<Scalar>> = vec![Vec::new(); names.len()];
        for (i, row) in rows.into_iter().enumerate() {
            ensure!(
                row.len() == names.len(),
                "record #{} has {} values, expected {}",
                i + 1,
                row.len(),
                names.len()
            );
            for (col, value) in columns.iter_mut().zip(row) {
                col.push(value);
            }
        }
        Self::from_columns(names.into_iter().zip(columns))
    }

    /// Append a column.
    ///
    /// # Errors
    /// Fails if `name` already exists or `values` breaks the rectangular shape.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Scalar>) -> Result<()> {
        let name = name.into();
        if self.column(&name).is_some() {
            bail!("duplicate column name {name:?}");
        }
        if self.columns.is_empty() && self.num_rows == 0 {
            self.num_rows = values.len();
        } else {
            ensure!(
                values.len() == self.num_rows,
                "column {name:?} has {} values, table has {} rows",
                values.len(),
                self.num_rows
            );
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    #[must_use]
    pub const fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// True when the table has no rows (it may still declare columns).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// Row views in order.
    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        (0..self.num_rows).map(move |index| RowRef { table: self, index })
    }
}

/// Borrowed view of one row. Serializes as a map in column order.
#[derive(Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> RowRef<'a> {
    pub fn values(self) -> impl Iterator<Item = &'a Scalar> + 'a {
        let index = self.index;
        self.table.columns.iter().map(move |c| &c.values[index])
    }

    pub fn iter(self) -> impl Iterator<Item = (&'a str, &'a Scalar)> + 'a {
        let index = self.index;
        self.table
            .columns
            .iter()
            .map(move |c| (c.name.as_str(), &c.values[index]))
    }
}

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.table.num_columns()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
