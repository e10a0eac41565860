//! Fixtures for tests of code built on this crate.
//!
//! ```
//! use obfuscator::testing::*;
//! use obfuscator::Obfuscator;
//!
//! let storage = seeded_storage("bucket", "people.csv", sample_csv());
//! let out = Obfuscator::new(storage)
//!     .process(r#"{"file_to_obfuscate": "s3://bucket/people.csv", "pii_fields": ["email"]}"#)
//!     .unwrap();
//! assert!(String::from_utf8_lossy(out.as_bytes()).contains("***"));
//! ```

use crate::io::cloud::{FakeObjectIO, ObjectIO};
use crate::table::{Scalar, Table};

/// Three people with an id, a name, an email and a score.
#[must_use]
pub fn sample_table() -> Table {
    let rows = [
        (1, "John Doe", "john@example.com", 91.5),
        (2, "Jane Roe", "jane@example.com", 78.0),
        (3, "Max Mustermann", "max@example.com", 64.25),
    ];
    let names = ["id", "name", "email", "score"]
        .map(String::from)
        .to_vec();
    Table::from_rows(
        names,
        rows.into_iter().map(|(id, name, email, score)| {
            vec![
                Scalar::Int(id),
                Scalar::from(name),
                Scalar::from(email),
                Scalar::Float(score),
            ]
        }),
    )
    .expect("sample rows match the header")
}

/// [`sample_table`] as CSV text.
#[must_use]
pub fn sample_csv() -> &'static [u8] {
    b"id,name,email,score\n\
      1,John Doe,john@example.com,91.5\n\
      2,Jane Roe,jane@example.com,78.0\n\
      3,Max Mustermann,max@example.com,64.25\n"
}

/// A fresh [`FakeObjectIO`] holding one object.
#[must_use]
pub fn seeded_storage(bucket: &str, key: &str, data: impl AsRef<[u8]>) -> FakeObjectIO {
    let storage = FakeObjectIO::new();
    storage
        .put_object(bucket, key, data.as_ref())
        .expect("seed in-memory object");
    storage
}

/// `rows` synthetic records with a header of `id,name,email,city`.
#[must_use]
pub fn generated_csv(rows: usize) -> Vec<u8> {
    let mut out = b"id,name,email,city\n".to_vec();
    for i in 0..rows {
        out.extend_from_slice(
            format!("{i},Person {i},person{i}@example.com,City {}\n", i % 97).as_bytes(),
        );
    }
    out
}
