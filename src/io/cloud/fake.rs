//! Fake implementations for testing.
//!
//! These implementations use in-memory data structures to simulate object
//! storage, making them ideal for unit testing without external dependencies.

use crate::io::cloud::traits::{CloudIOError, CloudResult, ErrorKind, ObjectIO};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type BucketStorage = Arc<Mutex<HashMap<String, HashMap<String, Vec<u8>>>>>;
type FailureMap = Arc<Mutex<HashMap<(String, String), ErrorKind>>>;

// ============================================================================
// FakeObjectIO
// ============================================================================

#[derive(Clone)]
pub struct FakeObjectIO {
    storage: BucketStorage,
    failures: FailureMap,
}

impl FakeObjectIO {
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(Mutex::new(HashMap::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Make every subsequent `get_object` for `bucket/key` fail with `kind`.
    pub fn fail_with(&self, bucket: &str, key: &str, kind: ErrorKind) {
        self.failures
            .lock()
            .expect("failures mutex poisoned")
            .insert((bucket.to_string(), key.to_string()), kind);
    }
}

impl Default for FakeObjectIO {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectIO for FakeObjectIO {
    fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> CloudResult<()> {
        self.storage
            .lock()
            .expect("storage mutex poisoned")
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>> {
        let injected = self
            .failures
            .lock()
            .expect("failures mutex poisoned")
            .get(&(bucket.to_string(), key.to_string()))
            .copied();
        if let Some(kind) = injected {
            return Err(CloudIOError::new(
                kind,
                format!("Injected failure for {bucket}/{key}"),
            ));
        }

        let storage = self.storage.lock().expect("storage mutex poisoned");
        storage
            .get(bucket)
            .and_then(|b| b.get(key))
            .cloned()
            .ok_or_else(|| {
                CloudIOError::new(
                    ErrorKind::NotFound,
                    format!("Object {bucket}/{key} not found"),
                )
            })
    }
}
