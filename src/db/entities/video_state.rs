use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Last playback position and track selections for one file.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "video_state")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub path: String,
    pub playback_position: i64,
    pub audio_track: Option<i32>,
    pub subtitle_track: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn new(
        path: impl Into<String>,
        playback_position: i64,
        audio_track: Option<i32>,
        subtitle_track: Option<i32>,
    ) -> Self {
        Self {
            path: path.into(),
            playback_position,
            audio_track,
            subtitle_track,
        }
    }

    /// Convert position to Duration
    pub fn position(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.playback_position.max(0) as u64)
    }
}
