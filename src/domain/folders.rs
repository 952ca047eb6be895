use std::collections::BTreeMap;
use std::path::Path;

use crate::data::Video;
use crate::datastore::{SortBy, SortOrder};
use crate::media::{Sortable, sort_items};

/// Directory that directly contains at least one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub path: String,
    pub name: String,
    pub media_count: usize,
    pub media_size: i64,
    pub media_duration_ms: i64,
}

impl Sortable for Folder {
    fn sort_title(&self) -> String {
        self.name.to_lowercase()
    }

    fn sort_duration(&self) -> i64 {
        self.media_duration_ms
    }

    fn sort_path(&self) -> &str {
        &self.path
    }

    fn sort_size(&self) -> i64 {
        self.media_size
    }
}

/// One folder per distinct parent directory, ordered by path.
pub fn group_by_folder(videos: &[Video]) -> Vec<Folder> {
    let mut folders: BTreeMap<&str, Folder> = BTreeMap::new();

    for video in videos {
        let folder = folders
            .entry(video.parent_path.as_str())
            .or_insert_with(|| Folder {
                path: video.parent_path.clone(),
                name: folder_name(&video.parent_path),
                media_count: 0,
                media_size: 0,
                media_duration_ms: 0,
            });
        folder.media_count += 1;
        folder.media_size += video.size;
        folder.media_duration_ms += video.duration_ms;
    }

    folders.into_values().collect()
}

pub fn sort_folders(
    mut folders: Vec<Folder>,
    sort_by: SortBy,
    sort_order: SortOrder,
) -> Vec<Folder> {
    sort_items(&mut folders, sort_by, sort_order);
    folders
}

fn folder_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaVideo;

    fn video(path: &str, duration_ms: i64, size: i64) -> Video {
        Video::from(MediaVideo {
            id: 0,
            path: path.to_string(),
            duration_ms,
            uri: String::new(),
            width: 0,
            height: 0,
            size,
        })
    }

    #[test]
    fn test_group_aggregates_per_parent() {
        let videos = vec![
            video("/sdcard/Movies/a.mp4", 1000, 10),
            video("/sdcard/DCIM/b.mp4", 500, 5),
            video("/sdcard/Movies/c.mp4", 2000, 20),
        ];

        let folders = group_by_folder(&videos);

        assert_eq!(
            folders,
            vec![
                Folder {
                    path: "/sdcard/DCIM".to_string(),
                    name: "DCIM".to_string(),
                    media_count: 1,
                    media_size: 5,
                    media_duration_ms: 500,
                },
                Folder {
                    path: "/sdcard/Movies".to_string(),
                    name: "Movies".to_string(),
                    media_count: 2,
                    media_size: 30,
                    media_duration_ms: 3000,
                },
            ]
        );
    }

    #[test]
    fn test_sort_folders_by_size_descending() {
        let folders = group_by_folder(&[
            video("/x/small/a.mp4", 1, 1),
            video("/x/big/b.mp4", 1, 100),
        ]);

        let sorted = sort_folders(folders, SortBy::Size, SortOrder::Descending);
        assert_eq!(sorted[0].name, "big");
    }

    #[test]
    fn test_sort_folders_by_title_ignores_case() {
        let folders = group_by_folder(&[
            video("/x/beta/a.mp4", 1, 1),
            video("/y/Alpha/b.mp4", 1, 1),
        ]);

        let sorted = sort_folders(folders, SortBy::Title, SortOrder::Ascending);
        assert_eq!(sorted[0].name, "Alpha");
    }
}
