use std::path::Path;

use super::index::{IndexRow, MediaIndex};
use super::sorting::Sortable;

/// One video file as reported by the media index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaVideo {
    pub id: i64,
    pub path: String,
    pub duration_ms: i64,
    pub uri: String,
    pub width: i32,
    pub height: i32,
    pub size: i64,
}

impl MediaVideo {
    pub fn from_row(index: &dyn MediaIndex, row: IndexRow) -> Self {
        let uri = index.content_uri(&row);
        Self {
            id: row.id,
            path: row.path,
            duration_ms: row.duration_ms,
            uri,
            width: row.width,
            height: row.height,
            size: row.size,
        }
    }
}

impl Sortable for MediaVideo {
    fn sort_title(&self) -> String {
        file_name_of(&self.path).to_lowercase()
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

pub(crate) fn file_name_of(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
