#![allow(dead_code)]

pub mod builders;

use futures::StreamExt;
use futures::stream::BoxStream;
use localplay::data::{LocalPreferencesRepository, LocalVideoRepository};
use localplay::db::Database;
use localplay::db::repository::VideoStateRepositoryImpl;
use localplay::media::{InMemoryMediaIndex, LocalMediaSource};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub struct TestContext {
    pub index: Arc<InMemoryMediaIndex>,
    pub videos: Arc<LocalVideoRepository>,
    pub preferences: Arc<LocalPreferencesRepository>,
    pub states: Arc<VideoStateRepositoryImpl>,
    pub temp_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self::in_dir(temp_dir).await
    }

    /// Open everything against an existing data directory
    pub async fn in_dir(temp_dir: TempDir) -> Self {
        let db = Database::connect(&temp_dir.path().join("localplay.db"))
            .await
            .expect("Failed to connect to test database");
        db.migrate().await.expect("Failed to run migrations");

        let states = Arc::new(VideoStateRepositoryImpl::new(db.get_connection()));
        let index = Arc::new(InMemoryMediaIndex::new());
        let videos = Arc::new(LocalVideoRepository::new(
            Arc::new(LocalMediaSource::new(index.clone())),
            states.clone(),
        ));
        let preferences = Arc::new(
            LocalPreferencesRepository::open(temp_dir.path())
                .await
                .expect("Failed to open preferences"),
        );

        Self {
            index,
            videos,
            preferences,
            states,
            temp_dir,
        }
    }
}

/// Next element of a stream, failing the test after a second
pub async fn next_within<T>(stream: &mut BoxStream<'static, T>) -> T {
    tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("Timed out waiting for stream element")
        .expect("Stream ended unexpectedly")
}

/// Assert a stream stays quiet for a short while
pub async fn assert_quiet<T: std::fmt::Debug>(stream: &mut BoxStream<'static, T>) {
    if let Ok(Some(item)) = tokio::time::timeout(Duration::from_millis(150), stream.next()).await {
        panic!("Unexpected stream element: {:?}", item);
    }
}
