//! The obfuscation pipeline: parse, load, mask, write.
//!
//! [`Obfuscator::process`] is the single entry point external callers need. It
//! runs the four stages in order on the calling thread and either returns the
//! complete encoded output or an [`ObfuscateError`]; no partial output escapes.
//!
//! ```
//! use obfuscator::io::cloud::{FakeObjectIO, ObjectIO};
//! use obfuscator::Obfuscator;
//!
//! # fn main() -> anyhow::Result<()> {
//! let storage = FakeObjectIO::new();
//! storage.put_object("bucket", "people.csv", b"id,name\n1,Ann\n")?;
//!
//! let out = Obfuscator::new(storage)
//!     .process(r#"{"file_to_obfuscate": "s3://bucket/people.csv", "pii_fields": ["name"]}"#)?;
//! assert_eq!(out.as_bytes(), b"id,name\n1,***\n");
//! # Ok(())
//! # }
//! ```

use crate::config::ObfuscatorConfig;
use crate::error::{ObfuscateError, Result};
use crate::io::cloud::ObjectIO;
use crate::loader::load_location;
use crate::mask::mask_fields;
use crate::request::Request;
use crate::writer::{OutputBuffer, write_table};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{Dispatch, error, info, info_span};

/// Runs obfuscation requests against one storage backend.
///
/// The struct holds no per-request state, so a shared reference can serve
/// concurrent callers as long as the storage backend allows it.
pub struct Obfuscator<O: ObjectIO> {
    storage: O,
    config: ObfuscatorConfig,
    dispatch: Option<Dispatch>,
}

impl<O: ObjectIO> Obfuscator<O> {
    pub fn new(storage: O) -> Self {
        Self {
            storage,
            config: ObfuscatorConfig::default(),
            dispatch: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ObfuscatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Route this obfuscator's log events to `dispatch` instead of the ambient default.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Parse `raw_request`, fetch the file, mask its PII columns and re-encode it
    /// in the original format.
    ///
    /// # Errors
    /// Any [`ObfuscateError`]. Request problems surface as `InvalidInput`; a panic
    /// inside a stage is caught and reported as `Processing`.
    pub fn process(&self, raw_request: &str) -> Result<OutputBuffer> {
        self.scoped(|| {
            let request = Request::parse_with(raw_request, &self.config).inspect_err(|e| {
                error!(error = %e, "input validation error");
            })?;
            self.run(&request)
        })
    }

    /// Run an already-parsed request through load, mask and write.
    ///
    /// # Errors
    /// As [`Obfuscator::process`], minus request validation.
    pub fn process_request(&self, request: &Request) -> Result<OutputBuffer> {
        self.scoped(|| self.run(request))
    }

    fn scoped<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }

    fn run(&self, request: &Request) -> Result<OutputBuffer> {
        let location = &request.location;
        let span = info_span!(
            "process",
            bucket = %location.bucket,
            key = %location.key,
            format = %location.format,
        );
        let _enter = span.enter();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            info!(uri = %location.uri, "reading file from storage");
            let table = load_location(&self.storage, location)?;

            info!(fields = ?request.fields_to_mask, "obfuscating PII fields");
            let masked = mask_fields(&table, &request.fields_to_mask);

            info!(
                rows = masked.num_rows(),
                columns = masked.num_columns(),
                "writing obfuscated data to byte stream in {} format",
                location.format
            );
            write_table(&masked, location.format)
        }));

        outcome
            .unwrap_or_else(|payload| Err(ObfuscateError::Processing(panic_message(&*payload))))
            .inspect_err(|e| error!(error = %e, "error processing file"))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "stage panicked".to_string())
}
