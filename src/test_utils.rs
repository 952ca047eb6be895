#![cfg(test)]

use crate::db::connection::Database;
use crate::media::{IndexRow, InMemoryMediaIndex};
use crate::player::{MediaItem, Player, SeekParameters, TrackSelectionParameters, Tracks};
use anyhow::Result;
use sea_orm::DatabaseConnection as SeaOrmConnection;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Test database wrapper that handles setup and teardown
pub struct TestDatabase {
    pub connection: Arc<SeaOrmConnection>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new test database with migrations
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("test.db");

        let db = Database::connect(&db_path).await?;
        db.migrate().await?;

        Ok(Self {
            connection: db.get_connection(),
            _temp_dir: temp_dir,
        })
    }

    /// Get a clone of the database connection
    pub fn connection(&self) -> Arc<SeaOrmConnection> {
        self.connection.clone()
    }
}

/// Helper function to create a test database
pub async fn create_test_db() -> Result<TestDatabase> {
    TestDatabase::new().await
}

/// Index row with plausible metadata for a file path
pub fn row(id: i64, path: &str, duration_ms: i64, size: i64) -> IndexRow {
    IndexRow {
        id,
        path: path.to_string(),
        duration_ms,
        width: 1920,
        height: 1080,
        size,
    }
}

/// In-memory index pre-populated with rows
pub fn index_with(rows: Vec<IndexRow>) -> Arc<InMemoryMediaIndex> {
    let index = Arc::new(InMemoryMediaIndex::new());
    index.replace_all(rows);
    index
}

#[derive(Debug, Default)]
struct FakePlayerState {
    media_item: Option<MediaItem>,
    tracks: Tracks,
    parameters: TrackSelectionParameters,
    parameter_writes: usize,
    seek_parameters: Option<SeekParameters>,
    seeks: Vec<i64>,
    position: Duration,
    duration: Option<Duration>,
}

/// Player that records every call made to it
#[derive(Debug, Default)]
pub struct FakePlayer {
    state: Mutex<FakePlayerState>,
}

impl FakePlayer {
    pub fn with_tracks(tracks: Tracks) -> Self {
        let player = Self::default();
        player.state.lock().unwrap().tracks = tracks;
        player
    }

    pub fn set_position(&self, position: Duration) {
        self.state.lock().unwrap().position = position;
    }

    pub fn set_duration(&self, duration: Duration) {
        self.state.lock().unwrap().duration = Some(duration);
    }

    pub fn media_item(&self) -> Option<MediaItem> {
        self.state.lock().unwrap().media_item.clone()
    }

    pub fn parameter_writes(&self) -> usize {
        self.state.lock().unwrap().parameter_writes
    }

    pub fn seek_parameters(&self) -> Option<SeekParameters> {
        self.state.lock().unwrap().seek_parameters
    }

    pub fn seeks(&self) -> Vec<i64> {
        self.state.lock().unwrap().seeks.clone()
    }
}

impl Player for FakePlayer {
    fn set_media_item(&self, item: MediaItem) {
        self.state.lock().unwrap().media_item = Some(item);
    }

    fn current_tracks(&self) -> Tracks {
        self.state.lock().unwrap().tracks.clone()
    }

    fn track_selection_parameters(&self) -> TrackSelectionParameters {
        self.state.lock().unwrap().parameters.clone()
    }

    fn set_track_selection_parameters(&self, parameters: TrackSelectionParameters) {
        let mut state = self.state.lock().unwrap();
        state.parameters = parameters;
        state.parameter_writes += 1;
    }

    fn current_position(&self) -> Duration {
        self.state.lock().unwrap().position
    }

    fn duration(&self) -> Option<Duration> {
        self.state.lock().unwrap().duration
    }

    fn seek_to(&self, position_ms: i64) {
        let mut state = self.state.lock().unwrap();
        state.seeks.push(position_ms);
        state.position = Duration::from_millis(position_ms.max(0) as u64);
    }

    fn set_seek_parameters(&self, parameters: SeekParameters) {
        self.state.lock().unwrap().seek_parameters = Some(parameters);
    }
}

/// Common test utilities
pub mod common {
    use std::future::Future;
    use std::time::Duration;
    use tokio::time::sleep;

    /// Wait for an async condition to become true
    pub async fn wait_for_async<F, Fut>(mut condition: F, max_wait: Duration) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        let start = std::time::Instant::now();

        while start.elapsed() < max_wait {
            if condition().await {
                return true;
            }
            sleep(Duration::from_millis(10)).await;
        }

        false
    }
}
