//! Engine-agnostic playback control.

pub mod extensions;
pub mod media_item;
pub mod traits;
pub mod types;

pub use extensions::PlayerExt;
pub use media_item::{MediaItem, PlayerItem, SubtitleConfiguration};
pub use traits::Player;
pub use types::{
    SeekParameters, TrackGroup, TrackSelectionOverride, TrackSelectionParameters, TrackType,
    Tracks,
};
