use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Videos shorter than this seek precisely even when fast seek is on `Auto`.
const AUTO_FAST_SEEK_MIN_DURATION: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortBy {
    #[default]
    Title,
    Length,
    Path,
    Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Label for the sort order, phrased for the key it applies to.
    pub fn pretty_name(&self, sort_by: SortBy) -> &'static str {
        match (sort_by, self) {
            (SortBy::Title | SortBy::Path, Self::Ascending) => "A-Z",
            (SortBy::Title | SortBy::Path, Self::Descending) => "Z-A",
            (SortBy::Length, Self::Ascending) => "Shortest",
            (SortBy::Length, Self::Descending) => "Longest",
            (SortBy::Size, Self::Ascending) => "Smallest",
            (SortBy::Size, Self::Descending) => "Largest",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThemeConfig {
    #[default]
    System,
    Off,
    On,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Resume {
    #[default]
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DoubleTapGesture {
    #[default]
    FastForwardAndRewind,
    PlayPause,
    Both,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FastSeek {
    Auto,
    Enable,
    #[default]
    Disable,
}

impl FastSeek {
    /// Whether seeking should snap to sync frames for a video of this length.
    pub fn is_enabled_for(&self, duration: Duration) -> bool {
        match self {
            Self::Enable => true,
            Self::Disable => false,
            Self::Auto => duration >= AUTO_FAST_SEEK_MIN_DURATION,
        }
    }
}

/// App-wide preferences: library sorting, grouping and appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AppPreferences {
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub group_videos_by_folder: bool,
    pub theme_config: ThemeConfig,
    pub use_dynamic_colors: bool,
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            sort_by: SortBy::Title,
            sort_order: SortOrder::Ascending,
            group_videos_by_folder: true,
            theme_config: ThemeConfig::System,
            use_dynamic_colors: true,
        }
    }
}

/// In-player behaviour preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct PlayerPreferences {
    pub resume: Resume,
    pub remember_player_brightness: bool,
    /// Screen brightness in `[0.0, 1.0]`.
    pub player_brightness: f32,
    pub double_tap_gesture: DoubleTapGesture,
    pub fast_seek: FastSeek,
    pub use_swipe_controls: bool,
    pub use_seek_controls: bool,
    pub remember_selections: bool,
}

impl Default for PlayerPreferences {
    fn default() -> Self {
        Self {
            resume: Resume::Yes,
            remember_player_brightness: false,
            player_brightness: 0.5,
            double_tap_gesture: DoubleTapGesture::FastForwardAndRewind,
            fast_seek: FastSeek::Disable,
            use_swipe_controls: true,
            use_seek_controls: true,
            remember_selections: true,
        }
    }
}
