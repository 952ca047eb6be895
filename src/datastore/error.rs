use thiserror::Error;

/// Persisted preference bytes did not match the expected schema.
#[derive(Error, Debug)]
pub enum CorruptionError {
    #[error("Cannot read datastore: not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Cannot read datastore: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum DataStoreError {
    #[error("Datastore is corrupt: {0}")]
    Corruption(#[from] CorruptionError),

    #[error("Failed to encode datastore: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Datastore IO error: {0}")]
    Io(#[from] std::io::Error),
}
