use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

use super::models::file_name_of;
use super::sorting::{Sortable, sort_items};
use crate::datastore::{SortBy, SortOrder};

/// Raw record returned by a media index query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub id: i64,
    pub path: String,
    pub duration_ms: i64,
    pub width: i32,
    pub height: i32,
    pub size: i64,
}

impl Sortable for IndexRow {
    fn sort_title(&self) -> String {
        file_name_of(&self.path).to_lowercase()
    }

    fn sort_duration(&self) -> i64 {
        self.duration_ms
    }

    fn sort_path(&self) -> &str {
        &self.path
    }

    fn sort_size(&self) -> i64 {
        self.size
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VideoFilter {
    #[default]
    All,
    /// Files directly inside this directory.
    InFolder(PathBuf),
    /// Files anywhere below this path.
    PathPrefix(PathBuf),
}

impl VideoFilter {
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            Self::All => true,
            Self::InFolder(folder) => path.parent() == Some(folder.as_path()),
            Self::PathPrefix(prefix) => path.starts_with(prefix),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoSort {
    pub by: SortBy,
    pub order: SortOrder,
}

/// Selection and ordering applied by an index query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoQuery {
    pub filter: VideoFilter,
    pub sort: Option<VideoSort>,
}

impl VideoQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_folder(folder: impl Into<PathBuf>) -> Self {
        Self {
            filter: VideoFilter::InFolder(folder.into()),
            sort: None,
        }
    }

    pub fn sorted_by(mut self, by: SortBy, order: SortOrder) -> Self {
        self.sort = Some(VideoSort { by, order });
        self
    }

    /// Filter and order rows the way an index backend is expected to.
    pub fn apply(&self, rows: impl IntoIterator<Item = IndexRow>) -> Vec<IndexRow> {
        let mut selected: Vec<IndexRow> = rows
            .into_iter()
            .filter(|row| self.filter.matches(Path::new(&row.path)))
            .collect();

        if let Some(sort) = self.sort {
            sort_items(&mut selected, sort.by, sort.order);
        }

        selected
    }
}

#[derive(Error, Debug)]
pub enum MediaIndexError {
    #[error("Media index unavailable: {0}")]
    Unavailable(String),

    #[error("Media index IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Receives a poke whenever anything in the index changes.
pub trait ChangeObserver: Send + Sync {
    fn on_change(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Shared video index the library is discovered from.
pub trait MediaIndex: Send + Sync {
    /// Base URI that row ids are appended to.
    fn collection_uri(&self) -> &str;

    /// Blocking query of the current rows.
    fn query(&self, query: &VideoQuery) -> Result<Vec<IndexRow>, MediaIndexError>;

    fn register_observer(&self, observer: Arc<dyn ChangeObserver>) -> ObserverId;

    fn unregister_observer(&self, id: ObserverId);

    /// URI a player should open for this row.
    fn content_uri(&self, row: &IndexRow) -> String {
        format!("{}/{}", self.collection_uri().trim_end_matches('/'), row.id)
    }
}

/// Keeps an observer registered for as long as it is alive.
pub struct ObserverRegistration {
    index: Arc<dyn MediaIndex>,
    id: ObserverId,
}

impl ObserverRegistration {
    pub fn register(index: Arc<dyn MediaIndex>, observer: Arc<dyn ChangeObserver>) -> Self {
        let id = index.register_observer(observer);
        Self { index, id }
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }
}

impl Drop for ObserverRegistration {
    fn drop(&mut self) {
        self.index.unregister_observer(self.id);
    }
}

impl std::fmt::Debug for ObserverRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistration")
            .field("id", &self.id)
            .finish()
    }
}

/// Observer bookkeeping shared by index implementations.
#[derive(Default)]
pub struct ObserverRegistry {
    next_id: AtomicU64,
    observers: Mutex<HashMap<ObserverId, Arc<dyn ChangeObserver>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, observer: Arc<dyn ChangeObserver>) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, observer);
        id
    }

    pub fn unregister(&self, id: ObserverId) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    pub fn len(&self) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Poke every registered observer. Callbacks run outside the lock.
    pub fn notify_all(&self) {
        let observers: Vec<Arc<dyn ChangeObserver>> = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        for observer in observers {
            observer.on_change();
        }
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Counter(AtomicUsize);

    impl ChangeObserver for Counter {
        fn on_change(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn row(path: &str, size: i64) -> IndexRow {
        IndexRow {
            id: size,
            path: path.to_string(),
            duration_ms: 0,
            width: 0,
            height: 0,
            size,
        }
    }

    #[test]
    fn test_filter_in_folder_is_not_recursive() {
        let filter = VideoFilter::InFolder(PathBuf::from("/movies"));
        assert!(filter.matches(Path::new("/movies/a.mp4")));
        assert!(!filter.matches(Path::new("/movies/sub/b.mp4")));

        let prefix = VideoFilter::PathPrefix(PathBuf::from("/movies"));
        assert!(prefix.matches(Path::new("/movies/sub/b.mp4")));
        assert!(!prefix.matches(Path::new("/moviesx/c.mp4")));
    }

    #[test]
    fn test_query_filters_then_sorts() {
        let rows = vec![
            row("/movies/b.mp4", 3),
            row("/other/c.mp4", 1),
            row("/movies/a.mp4", 2),
        ];
        let query = VideoQuery::in_folder("/movies").sorted_by(SortBy::Size, SortOrder::Descending);

        let result = query.apply(rows);
        let paths: Vec<_> = result.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/movies/b.mp4", "/movies/a.mp4"]);
    }

    #[test]
    fn test_registry_notifies_until_unregistered() {
        let registry = ObserverRegistry::new();
        let counter = Arc::new(Counter(AtomicUsize::new(0)));

        let id = registry.register(counter.clone());
        registry.notify_all();
        registry.unregister(id);
        registry.notify_all();

        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }
}
