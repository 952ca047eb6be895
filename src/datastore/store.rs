use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::error::{CorruptionError, DataStoreError};
use super::serializer::Serializer;
use crate::core::viewmodels::{Property, PropertySubscriber};

/// Outcome of reading the backing file when a store is opened.
#[derive(Debug)]
pub enum LoadStatus {
    /// Nothing persisted yet; the default snapshot is in use.
    Missing,
    Loaded,
    /// The file could not be decoded; the default snapshot is in use and the
    /// file is left untouched until the next successful write.
    Recovered(CorruptionError),
}

impl LoadStatus {
    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered(_))
    }
}

/// File-backed preference document exposed as a reactive snapshot.
pub struct DataStore<T> {
    path: PathBuf,
    serializer: Box<dyn Serializer<T>>,
    data: Property<T>,
    write_lock: Mutex<()>,
}

impl<T: Clone + Send + Sync + 'static> DataStore<T> {
    pub async fn open<S>(
        path: impl Into<PathBuf>,
        serializer: S,
    ) -> Result<(Self, LoadStatus), DataStoreError>
    where
        S: Serializer<T> + 'static,
    {
        let path = path.into();

        let (initial, status) = match tokio::fs::read(&path).await {
            Ok(bytes) => match serializer.read_from(&bytes) {
                Ok(value) => {
                    debug!("Loaded datastore from {:?}", path);
                    (value, LoadStatus::Loaded)
                }
                Err(e) => {
                    warn!("Datastore {:?} is corrupt, using defaults: {}", path, e);
                    (serializer.default_value(), LoadStatus::Recovered(e))
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No datastore at {:?}, using defaults", path);
                (serializer.default_value(), LoadStatus::Missing)
            }
            Err(e) => return Err(e.into()),
        };

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "datastore".to_string());

        let store = Self {
            path,
            serializer: Box::new(serializer),
            data: Property::new(initial, name),
            write_lock: Mutex::new(()),
        };

        Ok((store, status))
    }

    pub fn data(&self) -> PropertySubscriber<T> {
        self.data.subscribe()
    }

    pub fn current(&self) -> T {
        self.data.get()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Derive the next snapshot from the current one, persist it, then
    /// publish it. Writers are serialized so the file and the published
    /// value never disagree; on a failed write nothing is published.
    pub async fn update<F>(&self, transform: F) -> Result<T, DataStoreError>
    where
        F: FnOnce(&T) -> T,
    {
        let _guard = self.write_lock.lock().await;

        let next = transform(&self.data.get());
        let bytes = self.serializer.write_to(&next)?;
        write_atomically(&self.path, &bytes).await?;

        self.data.set(next.clone());
        Ok(next)
    }
}

impl<T> std::fmt::Debug for DataStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore")
            .field("path", &self.path)
            .finish()
    }
}

async fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut tmp_name = path.file_name().map(OsString::from).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, bytes).await?;
    tokio::fs::rename(&tmp_path, path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastore::preferences::{FastSeek, PlayerPreferences};
    use crate::datastore::serializer::PlayerPreferencesSerializer;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_missing_file_uses_default() {
        let dir = TempDir::new().unwrap();
        let (store, status) = DataStore::open(
            dir.path().join("player_preferences.json"),
            PlayerPreferencesSerializer::new(),
        )
        .await
        .unwrap();

        assert!(matches!(status, LoadStatus::Missing));
        assert_eq!(store.current(), PlayerPreferences::default());
    }

    #[tokio::test]
    async fn test_update_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("player_preferences.json");

        let (store, _) = DataStore::open(&path, PlayerPreferencesSerializer::new())
            .await
            .unwrap();
        let mut subscriber = store.data();

        let updated = store
            .update(|prefs| PlayerPreferences {
                fast_seek: FastSeek::Enable,
                ..prefs.clone()
            })
            .await
            .unwrap();

        assert_eq!(updated.fast_seek, FastSeek::Enable);
        assert!(subscriber.changed().await);
        assert_eq!(subscriber.get(), updated);
        drop(store);

        let (reopened, status) = DataStore::open(&path, PlayerPreferencesSerializer::new())
            .await
            .unwrap();
        assert!(matches!(status, LoadStatus::Loaded));
        assert_eq!(reopened.current(), updated);
    }

    #[tokio::test]
    async fn test_corrupt_file_recovers_with_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("player_preferences.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let (store, status) = DataStore::open(&path, PlayerPreferencesSerializer::new())
            .await
            .unwrap();

        assert!(status.is_recovered());
        assert_eq!(store.current(), PlayerPreferences::default());
        assert_eq!(std::fs::read(&path).unwrap(), b"{ not json");

        store.update(|prefs| prefs.clone()).await.unwrap();
        let (_, status) = DataStore::open(&path, PlayerPreferencesSerializer::new())
            .await
            .unwrap();
        assert!(matches!(status, LoadStatus::Loaded));
    }
}
