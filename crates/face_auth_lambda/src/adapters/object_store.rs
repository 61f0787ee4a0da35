use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectStoreError {
    #[error("object not found: {key}")]
    NotFound { key: String },
    #[error("{0}")]
    Backend(String),
}

/// Read access to the bucket visitor photos are uploaded to.
pub trait ObjectStore {
    fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, ObjectStoreError>;

    fn get_object(&self, key: &str) -> Result<Vec<u8>, ObjectStoreError>;

    fn list_keys(&self) -> Result<Vec<String>, ObjectStoreError>;
}
