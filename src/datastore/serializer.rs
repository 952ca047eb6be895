use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

use super::error::{CorruptionError, DataStoreError};
use super::preferences::{AppPreferences, PlayerPreferences};

/// Converts a preference snapshot to and from its persisted bytes.
pub trait Serializer<T>: Send + Sync {
    /// Snapshot used when nothing has been persisted yet or the file is corrupt.
    fn default_value(&self) -> T;

    fn read_from(&self, bytes: &[u8]) -> Result<T, CorruptionError>;

    fn write_to(&self, value: &T) -> Result<Vec<u8>, DataStoreError>;
}

/// JSON encoding shared by every preference document.
pub struct JsonSerializer<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonSerializer<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for JsonSerializer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JsonSerializer")
    }
}

impl<T> Serializer<T> for JsonSerializer<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    fn default_value(&self) -> T {
        T::default()
    }

    fn read_from(&self, bytes: &[u8]) -> Result<T, CorruptionError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(serde_json::from_str(text)?)
    }

    fn write_to(&self, value: &T) -> Result<Vec<u8>, DataStoreError> {
        serde_json::to_vec(value).map_err(DataStoreError::Encode)
    }
}

pub type AppPreferencesSerializer = JsonSerializer<AppPreferences>;
pub type PlayerPreferencesSerializer = JsonSerializer<PlayerPreferences>;
