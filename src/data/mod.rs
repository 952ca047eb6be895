//! Repositories the view models read from and write through.

pub mod models;
pub mod preferences_repository;
pub mod video_repository;

pub use models::{Video, VideoState};
pub use preferences_repository::{
    FakePreferencesRepository, LocalPreferencesRepository, PreferencesRepository,
};
pub use video_repository::{LocalVideoRepository, VideoRepository};
