use anyhow::{Context, Result};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::{HashMap, HashSet};
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;
use tracing::{debug, error, info, warn};
use url::Url;
use walkdir::WalkDir;

use super::index::{
    ChangeObserver, IndexRow, MediaIndex, MediaIndexError, ObserverId, ObserverRegistry,
    VideoQuery,
};

/// Duration and dimensions read from the file itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoMetadata {
    pub duration_ms: i64,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Default)]
struct Catalog {
    next_id: i64,
    ids: HashMap<PathBuf, i64>,
    metadata: HashMap<PathBuf, (SystemTime, VideoMetadata)>,
}

impl Catalog {
    fn id_for(&mut self, path: &Path) -> i64 {
        if let Some(id) = self.ids.get(path) {
            return *id;
        }
        self.next_id += 1;
        self.ids.insert(path.to_path_buf(), self.next_id);
        self.next_id
    }

    /// Row for a file found by the walk, or `None` when its metadata can no
    /// longer be read (e.g. it was removed mid-scan).
    fn row_for(&mut self, path: &Path, file_meta: io::Result<Metadata>) -> Option<IndexRow> {
        let file_meta = match file_meta {
            Ok(file_meta) => file_meta,
            Err(e) => {
                warn!("Skipping library entry {:?}: {}", path, e);
                return None;
            }
        };
        let modified = file_meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        let video = match self.metadata.get(path) {
            Some((seen, video)) if *seen == modified => *video,
            _ => {
                let video = probe::read_metadata(path);
                self.metadata.insert(path.to_path_buf(), (modified, video));
                video
            }
        };

        Some(IndexRow {
            id: self.id_for(path),
            path: path.to_string_lossy().into_owned(),
            duration_ms: video.duration_ms,
            width: video.width,
            height: video.height,
            size: file_meta.len() as i64,
        })
    }

    /// Forget files that were not part of the latest scan.
    fn retain_seen(&mut self, seen: &HashSet<PathBuf>) {
        self.ids.retain(|path, _| seen.contains(path));
        self.metadata.retain(|path, _| seen.contains(path));
    }
}

/// Media index over directories on the local filesystem.
///
/// Rows are produced by walking the roots on every query; row ids stay stable
/// for the lifetime of the index. Once [`FsMediaIndex::start_watching`] is
/// called, any create/modify/remove below a root pokes observers.
pub struct FsMediaIndex {
    roots: Vec<PathBuf>,
    extensions: HashSet<String>,
    observers: Arc<ObserverRegistry>,
    catalog: Mutex<Catalog>,
    watcher: Mutex<Option<RecommendedWatcher>>,
}

impl FsMediaIndex {
    pub fn new(roots: Vec<PathBuf>, extensions: &[String]) -> Self {
        Self {
            roots,
            extensions: extensions.iter().map(|ext| ext.to_lowercase()).collect(),
            observers: Arc::new(ObserverRegistry::new()),
            catalog: Mutex::new(Catalog::default()),
            watcher: Mutex::new(None),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn is_video(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(&ext.to_lowercase()))
    }

    /// Watch every existing root recursively. Calling it again replaces the
    /// previous watcher.
    pub fn start_watching(&self) -> Result<()> {
        info!("Setting up media library watcher");

        let observers = self.observers.clone();
        let mut watcher =
            notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| match res {
                Ok(event) => match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {
                        debug!("Library changed: {:?}", event.paths);
                        observers.notify_all();
                    }
                    _ => {}
                },
                Err(e) => error!("Library watcher error: {:?}", e),
            })
            .context("Failed to create library watcher")?;

        for root in &self.roots {
            if root.is_dir() {
                watcher
                    .watch(root, RecursiveMode::Recursive)
                    .with_context(|| format!("Failed to watch {}", root.display()))?;
                info!("Watching library root: {:?}", root);
            } else {
                warn!("Library root {:?} is not a directory, skipping", root);
            }
        }

        *self.watcher.lock().unwrap_or_else(PoisonError::into_inner) = Some(watcher);
        Ok(())
    }

    pub fn stop_watching(&self) {
        self.watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn scan(&self) -> Result<Vec<IndexRow>, MediaIndexError> {
        let mut catalog = self.catalog.lock().unwrap_or_else(PoisonError::into_inner);
        let mut rows = Vec::new();
        let mut seen = HashSet::new();

        for root in &self.roots {
            if !root.exists() {
                continue;
            }

            for entry in WalkDir::new(root).follow_links(false) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Skipping unreadable library entry: {}", e);
                        continue;
                    }
                };

                if !entry.file_type().is_file() || !self.is_video(entry.path()) {
                    continue;
                }

                let file_meta = entry.metadata().map_err(|e| {
                    e.into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("metadata unavailable"))
                });
                if let Some(row) = catalog.row_for(entry.path(), file_meta) {
                    seen.insert(entry.path().to_path_buf());
                    rows.push(row);
                }
            }
        }

        catalog.retain_seen(&seen);
        Ok(rows)
    }
}

impl MediaIndex for FsMediaIndex {
    fn collection_uri(&self) -> &str {
        "file://"
    }

    fn query(&self, query: &VideoQuery) -> Result<Vec<IndexRow>, MediaIndexError> {
        let rows = self.scan()?;
        Ok(query.apply(rows))
    }

    fn register_observer(&self, observer: Arc<dyn ChangeObserver>) -> ObserverId {
        self.observers.register(observer)
    }

    fn unregister_observer(&self, id: ObserverId) {
        self.observers.unregister(id);
    }

    fn content_uri(&self, row: &IndexRow) -> String {
        Url::from_file_path(&row.path)
            .map(String::from)
            .unwrap_or_else(|_| format!("file://{}", row.path))
    }
}

impl std::fmt::Debug for FsMediaIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsMediaIndex")
            .field("roots", &self.roots)
            .field("extensions", &self.extensions)
            .field("observers", &self.observers)
            .finish()
    }
}

#[cfg(feature = "probe")]
mod probe {
    use super::VideoMetadata;
    use gstreamer as gst;
    use gstreamer_pbutils as pbutils;
    use std::path::Path;
    use std::sync::OnceLock;
    use tracing::warn;

    const DISCOVER_TIMEOUT_SECS: u64 = 5;

    fn gstreamer_ready() -> bool {
        static READY: OnceLock<bool> = OnceLock::new();
        *READY.get_or_init(|| match gst::init() {
            Ok(()) => true,
            Err(e) => {
                warn!("GStreamer unavailable, skipping metadata probing: {}", e);
                false
            }
        })
    }

    pub fn read_metadata(path: &Path) -> VideoMetadata {
        if !gstreamer_ready() {
            return VideoMetadata::default();
        }

        let Ok(uri) = url::Url::from_file_path(path) else {
            return VideoMetadata::default();
        };

        let info = pbutils::Discoverer::new(gst::ClockTime::from_seconds(DISCOVER_TIMEOUT_SECS))
            .and_then(|discoverer| discoverer.discover_uri(uri.as_str()));

        match info {
            Ok(info) => {
                let duration_ms = info.duration().map(|d| d.mseconds() as i64).unwrap_or(0);
                let (width, height) = info
                    .video_streams()
                    .first()
                    .map(|stream| (stream.width() as i32, stream.height() as i32))
                    .unwrap_or((0, 0));
                VideoMetadata {
                    duration_ms,
                    width,
                    height,
                }
            }
            Err(e) => {
                warn!("Failed to probe {:?}: {}", path, e);
                VideoMetadata::default()
            }
        }
    }
}

#[cfg(not(feature = "probe"))]
mod probe {
    use super::VideoMetadata;
    use std::path::Path;

    pub fn read_metadata(_path: &Path) -> VideoMetadata {
        VideoMetadata::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn extensions() -> Vec<String> {
        vec!["mp4".to_string(), "mkv".to_string()]
    }

    #[test]
    fn test_scan_filters_by_extension() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("shows")).unwrap();
        std::fs::write(dir.path().join("a.mp4"), b"12345").unwrap();
        std::fs::write(dir.path().join("shows").join("b.MKV"), b"1").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let index = FsMediaIndex::new(vec![dir.path().to_path_buf()], &extensions());
        let rows = index.query(&VideoQuery::all()).unwrap();

        assert_eq!(rows.len(), 2);
        let a = rows.iter().find(|r| r.path.ends_with("a.mp4")).unwrap();
        assert_eq!(a.size, 5);
    }

    #[test]
    fn test_ids_are_stable_across_queries() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.mp4"), b"1").unwrap();

        let index = FsMediaIndex::new(vec![dir.path().to_path_buf()], &extensions());
        let first = index.query(&VideoQuery::all()).unwrap();

        std::fs::write(dir.path().join("b.mp4"), b"2").unwrap();
        let second = index.query(&VideoQuery::all()).unwrap();

        let a_again = second.iter().find(|r| r.path.ends_with("a.mp4")).unwrap();
        assert_eq!(a_again.id, first[0].id);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_unreadable_metadata_skips_only_that_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.mp4"), b"1").unwrap();
        let mut catalog = Catalog::default();

        let gone = dir.path().join("gone.mp4");
        let vanished = Err(io::Error::from(io::ErrorKind::NotFound));
        assert!(catalog.row_for(&gone, vanished).is_none());

        let present = dir.path().join("a.mp4");
        let row = catalog.row_for(&present, std::fs::metadata(&present)).unwrap();
        assert_eq!(row.size, 1);
        assert!(!catalog.ids.contains_key(&gone));
    }

    #[test]
    fn test_deleted_files_are_dropped_from_catalog() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.mp4"), b"1").unwrap();
        std::fs::write(dir.path().join("b.mp4"), b"2").unwrap();
        let index = FsMediaIndex::new(vec![dir.path().to_path_buf()], &extensions());
        assert_eq!(index.query(&VideoQuery::all()).unwrap().len(), 2);

        std::fs::remove_file(dir.path().join("b.mp4")).unwrap();
        let rows = index.query(&VideoQuery::all()).unwrap();

        assert_eq!(rows.len(), 1);
        let catalog = index.catalog.lock().unwrap();
        assert_eq!(catalog.ids.len(), 1);
        assert_eq!(catalog.metadata.len(), 1);
        assert!(catalog.ids.contains_key(&dir.path().join("a.mp4")));
    }

    #[test]
    fn test_missing_root_yields_no_rows() {
        let index = FsMediaIndex::new(vec![PathBuf::from("/does/not/exist")], &extensions());
        assert!(index.query(&VideoQuery::all()).unwrap().is_empty());
    }

    #[test]
    fn test_content_uri_is_file_url() {
        let index = FsMediaIndex::new(Vec::new(), &extensions());
        let row = IndexRow {
            id: 1,
            path: "/videos/my clip.mp4".to_string(),
            duration_ms: 0,
            width: 0,
            height: 0,
            size: 0,
        };
        assert_eq!(index.content_uri(&row), "file:///videos/my%20clip.mp4");
    }
}
