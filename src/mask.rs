//! Column masking.
//!
//! Masking replaces every cell of each named column with [`SENTINEL`],
//! whatever the original type. Names that match no column are ignored. The
//! default [`mask_fields`] works on a copy; [`mask_fields_in_place`] is the
//! explicit opt-in for callers that own the table and want to skip the clone.

use crate::table::{Scalar, Table};

/// Replacement written into masked cells.
pub const SENTINEL: &str = "***";

/// Return a copy of `table` with every column named in `fields` masked.
///
/// Column order, row order and unmasked columns are unchanged, and `table`
/// itself is left untouched.
#[must_use]
pub fn mask_fields<S: AsRef<str>>(table: &Table, fields: &[S]) -> Table {
    let mut out = table.clone();
    mask_fields_in_place(&mut out, fields);
    out
}

/// Mask the named columns of `table` directly. Returns how many columns matched.
pub fn mask_fields_in_place<S: AsRef<str>>(table: &mut Table, fields: &[S]) -> usize {
    let mut masked = 0;
    for field in fields {
        if let Some(column) = table.column_mut(field.as_ref()) {
            column.values_mut().fill(Scalar::Str(SENTINEL.to_string()));
            masked += 1;
        }
    }
    masked
}
