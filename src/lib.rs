//! # Obfuscator
//!
//! A **PII masking library** for tabular files held in object storage. Given a
//! request naming a file and a list of sensitive columns, it fetches the file,
//! replaces every value in those columns with `***`, and returns the result
//! re-encoded in the original format.
//!
//! ## Key Features
//!
//! - **Three formats** - CSV, JSON (array or JSON Lines) and Parquet, each behind a Cargo feature
//! - **Lossless pass-through** - unmasked columns come back with the same values and order
//! - **Pluggable storage** - anything implementing [`ObjectIO`](io::cloud::ObjectIO)
//! - **Typed errors** - every failure is an [`ObfuscateError`] with a stable [`ErrorCategory`]
//!
//! ## Quick Start
//!
//! ```
//! use obfuscator::io::cloud::{FakeObjectIO, ObjectIO};
//! use obfuscator::Obfuscator;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let storage = FakeObjectIO::new();
//! storage.put_object(
//!     "my-bucket",
//!     "people.csv",
//!     b"id,name,email\n1,John Doe,john@example.com\n",
//! )?;
//!
//! let out = Obfuscator::new(storage).process(
//!     r#"{"file_to_obfuscate": "s3://my-bucket/people.csv", "pii_fields": ["name", "email"]}"#,
//! )?;
//! assert_eq!(out.as_bytes(), b"id,name,email\n1,***,***\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Stages
//!
//! [`Obfuscator::process`] runs four stages, each usable on its own:
//!
//! 1. [`Request::parse`] - validate the JSON request and split the location
//! 2. [`load_table`] - fetch the object and decode it into a [`Table`]
//! 3. [`mask_fields`] - replace the named columns with [`SENTINEL`]
//! 4. [`write_table`] - encode the table into an [`OutputBuffer`]
//!
//! ## Feature Flags
//!
//! - `io-csv` - CSV support (enabled by default)
//! - `io-jsonl` - JSON / JSON Lines support (enabled by default)
//! - `io-parquet` - Parquet support via Arrow (enabled by default)
//!
//! A request for a format whose feature is disabled fails with
//! [`ObfuscateError::UnsupportedFormat`].
//!
//! ## Logging
//!
//! The library emits [`tracing`] events only. Binaries install a subscriber with
//! [`logging::init_tracing`]; embedders can route one obfuscator's events with
//! [`Obfuscator::with_dispatch`].

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod io;
pub mod loader;
pub mod logging;
pub mod mask;
pub mod pipeline;
pub mod request;
pub mod table;
pub mod testing;
pub mod writer;

pub use config::ObfuscatorConfig;
pub use error::{ErrorCategory, ObfuscateError, Result};
pub use loader::{load_location, load_table};
pub use mask::{SENTINEL, mask_fields, mask_fields_in_place};
pub use pipeline::Obfuscator;
pub use request::{Format, Location, Request};
pub use table::{Column, Scalar, Table};
pub use writer::{OutputBuffer, write_table, write_table_as};
