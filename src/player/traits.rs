use std::time::Duration;

use super::media_item::MediaItem;
use super::types::{SeekParameters, TrackSelectionParameters, Tracks};

/// Playback engine surface the player screen drives.
pub trait Player: Send + Sync {
    fn set_media_item(&self, item: MediaItem);

    fn current_tracks(&self) -> Tracks;

    fn track_selection_parameters(&self) -> TrackSelectionParameters;

    fn set_track_selection_parameters(&self, parameters: TrackSelectionParameters);

    fn current_position(&self) -> Duration;

    fn duration(&self) -> Option<Duration>;

    fn seek_to(&self, position_ms: i64);

    /// Engines without seek tuning ignore this.
    fn set_seek_parameters(&self, _parameters: SeekParameters) {}
}
