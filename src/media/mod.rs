//! Video discovery: the media index abstraction, its implementations and the
//! change-driven enumerator built on top of it.

pub mod fs_index;
pub mod index;
pub mod memory_index;
pub mod models;
pub mod sorting;
pub mod source;

pub use fs_index::{FsMediaIndex, VideoMetadata};
pub use index::{
    ChangeObserver, IndexRow, MediaIndex, MediaIndexError, ObserverId, ObserverRegistration,
    ObserverRegistry, VideoFilter, VideoQuery, VideoSort,
};
pub use memory_index::InMemoryMediaIndex;
pub use models::MediaVideo;
pub use sorting::{Sortable, sort_items};
pub use source::{LocalMediaSource, MediaSource};
