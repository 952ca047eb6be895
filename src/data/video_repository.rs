use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use std::sync::Arc;
use tracing::debug;

use super::models::{Video, VideoState};
use crate::db::repository::VideoStateRepository;
use crate::media::{MediaSource, VideoQuery};

/// Library contents plus the per-file playback state cache.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// All videos, re-emitted whenever the library changes.
    fn videos(&self) -> BoxStream<'static, Vec<Video>>;

    async fn get_video_state(&self, path: &str) -> Result<Option<VideoState>>;

    /// Replace whatever is saved for `path`.
    async fn save_video_state(
        &self,
        path: &str,
        position_ms: i64,
        audio_track_index: Option<i32>,
        subtitle_track_index: Option<i32>,
    ) -> Result<()>;
}

pub struct LocalVideoRepository {
    source: Arc<dyn MediaSource>,
    states: Arc<dyn VideoStateRepository>,
}

impl LocalVideoRepository {
    pub fn new(source: Arc<dyn MediaSource>, states: Arc<dyn VideoStateRepository>) -> Self {
        Self { source, states }
    }
}

impl std::fmt::Debug for LocalVideoRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalVideoRepository").finish_non_exhaustive()
    }
}

#[async_trait]
impl VideoRepository for LocalVideoRepository {
    fn videos(&self) -> BoxStream<'static, Vec<Video>> {
        self.source
            .videos_stream(VideoQuery::all())
            .map(|videos| videos.into_iter().map(Video::from).collect())
            .boxed()
    }

    async fn get_video_state(&self, path: &str) -> Result<Option<VideoState>> {
        let state = self
            .states
            .find_by_path(path)
            .await
            .with_context(|| format!("Failed to load video state for {}", path))?;
        Ok(state.map(VideoState::from))
    }

    async fn save_video_state(
        &self,
        path: &str,
        position_ms: i64,
        audio_track_index: Option<i32>,
        subtitle_track_index: Option<i32>,
    ) -> Result<()> {
        debug!(
            "save state for [{}]: [{}, {:?}, {:?}]",
            path, position_ms, audio_track_index, subtitle_track_index
        );

        self.states
            .upsert(path, position_ms, audio_track_index, subtitle_track_index)
            .await
            .with_context(|| format!("Failed to save video state for {}", path))
    }
}
