use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TrackType {
    Audio,
    /// Subtitles and closed captions.
    Text,
    Video,
}

impl TrackType {
    pub fn label(&self) -> &'static str {
        match self {
            TrackType::Audio => "audio",
            TrackType::Text => "subtitle",
            TrackType::Video => "video",
        }
    }
}

/// One group of alternative tracks exposed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackGroup {
    pub id: String,
    pub track_type: TrackType,
    pub track_count: usize,
    pub selected: bool,
}

impl TrackGroup {
    pub fn new(id: impl Into<String>, track_type: TrackType) -> Self {
        Self {
            id: id.into(),
            track_type,
            track_count: 1,
            selected: false,
        }
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tracks {
    pub groups: Vec<TrackGroup>,
}

impl Tracks {
    pub fn new(groups: Vec<TrackGroup>) -> Self {
        Self { groups }
    }

    pub fn groups_of(&self, track_type: TrackType) -> Vec<&TrackGroup> {
        self.groups
            .iter()
            .filter(|group| group.track_type == track_type)
            .collect()
    }

    /// Position of the selected group among the groups of `track_type`.
    pub fn selected_index(&self, track_type: TrackType) -> Option<i32> {
        self.groups_of(track_type)
            .iter()
            .position(|group| group.selected)
            .map(|index| index as i32)
    }
}

/// Forces a specific track of a group to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSelectionOverride {
    pub group_id: String,
    pub track_index: usize,
}

/// Constraints the engine applies when choosing tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackSelectionParameters {
    disabled_types: BTreeSet<TrackType>,
    overrides: BTreeMap<TrackType, TrackSelectionOverride>,
}

impl TrackSelectionParameters {
    pub fn is_disabled(&self, track_type: TrackType) -> bool {
        self.disabled_types.contains(&track_type)
    }

    pub fn override_for(&self, track_type: TrackType) -> Option<&TrackSelectionOverride> {
        self.overrides.get(&track_type)
    }

    pub fn with_track_type_disabled(mut self, track_type: TrackType, disabled: bool) -> Self {
        if disabled {
            self.disabled_types.insert(track_type);
        } else {
            self.disabled_types.remove(&track_type);
        }
        self
    }

    /// Replace any existing override for the same track type.
    pub fn with_override(
        mut self,
        track_type: TrackType,
        selection: TrackSelectionOverride,
    ) -> Self {
        self.overrides.insert(track_type, selection);
        self
    }
}

/// Where a seek may land relative to the requested position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeekParameters {
    #[default]
    Exact,
    /// Nearest sync frame at or before the position.
    PreviousSync,
    /// Nearest sync frame at or after the position.
    NextSync,
    ClosestSync,
}
