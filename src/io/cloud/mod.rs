//! Object storage abstraction.
//!
//! The pipeline only ever needs "fetch the bytes at `bucket/key`", so storage is
//! modelled as the small synchronous [`ObjectIO`] trait with provider-agnostic
//! errors ([`CloudIOError`] / [`ErrorKind`]).
//!
//! ## Implementations
//!
//! - [`FakeObjectIO`] - in-memory buckets with failure injection, for tests
//! - [`LocalObjectIO`] - directories on disk standing in for buckets, used by the
//!   command-line tool
//!
//! ## Implementing for Real Providers
//! ```ignore
//! use obfuscator::io::cloud::*;
//! use aws_sdk_s3::Client;
//!
//! struct S3ObjectIO {
//!     client: Client,
//!     rt: tokio::runtime::Runtime,
//! }
//!
//! impl ObjectIO for S3ObjectIO {
//!     fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>> {
//!         self.rt.block_on(async {
//!             // map NoSuchKey to ErrorKind::NotFound, AccessDenied to ErrorKind::Authorization
//!         })
//!     }
//!     // ...
//! }
//! ```
//!
//! ## Usage
//! ```
//! use obfuscator::io::cloud::*;
//!
//! # fn main() -> CloudResult<()> {
//! let storage = FakeObjectIO::new();
//! storage.put_object("bucket", "data.csv", b"id,name\n1,Ann\n")?;
//! assert_eq!(storage.get_object("bucket", "data.csv")?, b"id,name\n1,Ann\n");
//! # Ok(())
//! # }
//! ```

pub mod fake;
pub mod local;
pub mod traits;

pub use fake::*;
pub use local::*;
pub use traits::*;
