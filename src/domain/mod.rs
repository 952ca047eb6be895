//! Use cases combining the library with user preferences.

pub mod folders;
pub mod sorted_videos;

pub use folders::{Folder, group_by_folder, sort_folders};
pub use sorted_videos::GetSortedVideos;
