use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::trace;

use super::index::{
    ChangeObserver, IndexRow, MediaIndex, MediaIndexError, ObserverId, ObserverRegistry,
    VideoQuery,
};

pub const DEFAULT_COLLECTION_URI: &str = "content://media/external/video/media";

/// Media index held entirely in memory. Every mutation pokes observers.
#[derive(Debug)]
pub struct InMemoryMediaIndex {
    collection_uri: String,
    rows: RwLock<Vec<IndexRow>>,
    observers: ObserverRegistry,
    failing: AtomicBool,
}

impl InMemoryMediaIndex {
    pub fn new() -> Self {
        Self::with_collection_uri(DEFAULT_COLLECTION_URI)
    }

    pub fn with_collection_uri(collection_uri: impl Into<String>) -> Self {
        Self {
            collection_uri: collection_uri.into(),
            rows: RwLock::new(Vec::new()),
            observers: ObserverRegistry::new(),
            failing: AtomicBool::new(false),
        }
    }

    /// Insert a row, replacing any row with the same id.
    pub fn insert(&self, row: IndexRow) {
        {
            let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
            rows.retain(|existing| existing.id != row.id);
            rows.push(row);
        }
        self.notify_change();
    }

    pub fn remove(&self, id: i64) -> bool {
        let removed = {
            let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
            let before = rows.len();
            rows.retain(|existing| existing.id != id);
            rows.len() != before
        };
        if removed {
            self.notify_change();
        }
        removed
    }

    pub fn replace_all(&self, new_rows: Vec<IndexRow>) {
        *self.rows.write().unwrap_or_else(PoisonError::into_inner) = new_rows;
        self.notify_change();
    }

    /// Signal observers without touching the rows.
    pub fn notify_change(&self) {
        trace!("In-memory index changed, notifying {} observer(s)", self.observers.len());
        self.observers.notify_all();
    }

    /// Make subsequent queries fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl Default for InMemoryMediaIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaIndex for InMemoryMediaIndex {
    fn collection_uri(&self) -> &str {
        &self.collection_uri
    }

    fn query(&self, query: &VideoQuery) -> Result<Vec<IndexRow>, MediaIndexError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MediaIndexError::Unavailable(
                "in-memory index set to fail".to_string(),
            ));
        }

        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Ok(query.apply(rows.iter().cloned()))
    }

    fn register_observer(&self, observer: Arc<dyn ChangeObserver>) -> ObserverId {
        self.observers.register(observer)
    }

    fn unregister_observer(&self, id: ObserverId) {
        self.observers.unregister(id);
    }
}
