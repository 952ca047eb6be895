use std::path::Path;
use std::time::Duration;

use crate::db::entities::VideoStateModel;
use crate::media::{MediaVideo, Sortable};

/// Library entry as shown by the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    pub id: i64,
    pub path: String,
    /// File name including extension.
    pub name: String,
    /// Directory containing the file.
    pub parent_path: String,
    pub duration_ms: i64,
    pub uri: String,
    pub width: i32,
    pub height: i32,
    pub size: i64,
}

impl Video {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms.max(0) as u64)
    }
}

impl From<MediaVideo> for Video {
    fn from(media: MediaVideo) -> Self {
        let path = Path::new(&media.path);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| media.path.clone());
        let parent_path = path
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            id: media.id,
            name,
            parent_path,
            path: media.path,
            duration_ms: media.duration_ms,
            uri: media.uri,
            width: media.width,
            height: media.height,
            size: media.size,
        }
    }
}

impl Sortable for Video {
    fn sort_title(&self) -> String {
        self.name.to_lowercase()
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

/// Saved playback state for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoState {
    pub path: String,
    pub position_ms: i64,
    pub audio_track_index: Option<i32>,
    pub subtitle_track_index: Option<i32>,
}

impl VideoState {
    pub fn position(&self) -> Duration {
        Duration::from_millis(self.position_ms.max(0) as u64)
    }
}

impl From<VideoStateModel> for VideoState {
    fn from(model: VideoStateModel) -> Self {
        Self {
            path: model.path,
            position_ms: model.playback_position,
            audio_track_index: model.audio_track,
            subtitle_track_index: model.subtitle_track,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_from_media_splits_path() {
        let video = Video::from(MediaVideo {
            id: 3,
            path: "/sdcard/Movies/Trip.MKV".to_string(),
            duration_ms: 90_000,
            uri: "content://media/external/video/media/3".to_string(),
            width: 1280,
            height: 720,
            size: 4096,
        });

        assert_eq!(video.name, "Trip.MKV");
        assert_eq!(video.parent_path, "/sdcard/Movies");
        assert_eq!(video.duration(), Duration::from_secs(90));
        assert_eq!(video.sort_title(), "trip.mkv");
    }

    #[test]
    fn test_video_state_from_model() {
        let state = VideoState::from(VideoStateModel::new("/a.mp4", 15000, Some(0), None));
        assert_eq!(state.position(), Duration::from_secs(15));
        assert_eq!(state.audio_track_index, Some(0));
        assert_eq!(state.subtitle_track_index, None);
    }
}
