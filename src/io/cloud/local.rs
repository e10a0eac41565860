//! Filesystem-backed object storage.
//!
//! Buckets are first-level directories under a root and keys are relative paths
//! inside them, so `s3://bucket/dir/data.csv` resolves to
//! `<root>/bucket/dir/data.csv`.

use crate::io::cloud::traits::{CloudIOError, CloudResult, ErrorKind, ObjectIO};
use std::fs::{create_dir_all, read, write};
use std::io;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalObjectIO {
    root: PathBuf,
}

impl LocalObjectIO {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, bucket: &str, key: &str) -> CloudResult<PathBuf> {
        for (what, part) in [("bucket", bucket), ("key", key)] {
            let confined = !part.is_empty()
                && Path::new(part)
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)));
            if !confined {
                return Err(CloudIOError::new(
                    ErrorKind::InvalidInput,
                    format!("Invalid {what} for local storage: {part:?}"),
                ));
            }
        }
        Ok(self.root.join(bucket).join(key))
    }
}

fn map_io_error(err: &io::Error, bucket: &str, key: &str) -> CloudIOError {
    let kind = match err.kind() {
        io::ErrorKind::NotFound => ErrorKind::NotFound,
        io::ErrorKind::PermissionDenied => ErrorKind::Authorization,
        _ => ErrorKind::Other,
    };
    CloudIOError::new(kind, format!("Object {bucket}/{key}")).with_source(err.to_string())
}

impl ObjectIO for LocalObjectIO {
    fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> CloudResult<()> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            create_dir_all(parent).map_err(|e| map_io_error(&e, bucket, key))?;
        }
        write(&path, data).map_err(|e| map_io_error(&e, bucket, key))
    }

    fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>> {
        let path = self.object_path(bucket, key)?;
        read(&path).map_err(|e| map_io_error(&e, bucket, key))
    }
}
