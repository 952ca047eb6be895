use super::{BaseRepository, Repository};
use crate::db::entities::{VideoState, VideoStateActiveModel, VideoStateModel, video_state};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use std::sync::Arc;

/// Repository trait for the per-path playback state cache
#[async_trait]
pub trait VideoStateRepository: Send + Sync {
    /// Find the saved state for a file
    async fn find_by_path(&self, path: &str) -> Result<Option<VideoStateModel>>;

    /// Insert or replace the state for a file in a single statement
    async fn upsert(
        &self,
        path: &str,
        playback_position: i64,
        audio_track: Option<i32>,
        subtitle_track: Option<i32>,
    ) -> Result<()>;
}

#[derive(Debug)]
pub struct VideoStateRepositoryImpl {
    base: BaseRepository,
}

impl VideoStateRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl Repository<VideoStateModel> for VideoStateRepositoryImpl {
    type Entity = VideoState;

    async fn find_by_id(&self, id: &str) -> Result<Option<VideoStateModel>> {
        Ok(VideoState::find_by_id(id.to_string())
            .one(self.base.db.as_ref())
            .await?)
    }

    async fn find_all(&self) -> Result<Vec<VideoStateModel>> {
        Ok(VideoState::find().all(self.base.db.as_ref()).await?)
    }

    async fn insert(&self, entity: VideoStateModel) -> Result<VideoStateModel> {
        let active_model = VideoStateActiveModel {
            path: Set(entity.path),
            playback_position: Set(entity.playback_position),
            audio_track: Set(entity.audio_track),
            subtitle_track: Set(entity.subtitle_track),
        };

        Ok(active_model.insert(self.base.db.as_ref()).await?)
    }

    async fn update(&self, entity: VideoStateModel) -> Result<VideoStateModel> {
        let active_model: VideoStateActiveModel = entity.into();
        Ok(active_model
            .reset_all()
            .update(self.base.db.as_ref())
            .await?)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        VideoState::delete_by_id(id.to_string())
            .exec(self.base.db.as_ref())
            .await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(VideoState::find().count(self.base.db.as_ref()).await?)
    }
}

#[async_trait]
impl VideoStateRepository for VideoStateRepositoryImpl {
    async fn find_by_path(&self, path: &str) -> Result<Option<VideoStateModel>> {
        self.find_by_id(path).await
    }

    async fn upsert(
        &self,
        path: &str,
        playback_position: i64,
        audio_track: Option<i32>,
        subtitle_track: Option<i32>,
    ) -> Result<()> {
        let active_model = VideoStateActiveModel {
            path: Set(path.to_string()),
            playback_position: Set(playback_position),
            audio_track: Set(audio_track),
            subtitle_track: Set(subtitle_track),
        };

        VideoState::insert(active_model)
            .on_conflict(
                OnConflict::column(video_state::Column::Path)
                    .update_columns([
                        video_state::Column::PlaybackPosition,
                        video_state::Column::AudioTrack,
                        video_state::Column::SubtitleTrack,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.base.db.as_ref())
            .await?;

        Ok(())
    }
}
