//! Preference documents persisted as JSON and exposed as reactive snapshots.

pub mod error;
pub mod preferences;
pub mod serializer;
pub mod store;

pub use error::{CorruptionError, DataStoreError};
pub use preferences::{
    AppPreferences, DoubleTapGesture, FastSeek, PlayerPreferences, Resume, SortBy, SortOrder,
    ThemeConfig,
};
pub use serializer::{
    AppPreferencesSerializer, JsonSerializer, PlayerPreferencesSerializer, Serializer,
};
pub use store::{DataStore, LoadStatus};
