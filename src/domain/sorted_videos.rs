use futures::future;
use futures::stream::{self, BoxStream, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

use crate::data::{PreferencesRepository, Video, VideoRepository};
use crate::datastore::AppPreferences;
use crate::media::sort_items;

enum Input {
    Videos(Vec<Video>),
    Preferences(AppPreferences),
}

/// Library videos ordered by the current app preferences.
#[derive(Clone)]
pub struct GetSortedVideos {
    videos: Arc<dyn VideoRepository>,
    preferences: Arc<dyn PreferencesRepository>,
}

impl GetSortedVideos {
    pub fn new(
        videos: Arc<dyn VideoRepository>,
        preferences: Arc<dyn PreferencesRepository>,
    ) -> Self {
        Self { videos, preferences }
    }

    /// Emits once both the library and the preferences are known, then again
    /// whenever either changes. With `folder`, only videos directly inside it
    /// are kept.
    pub fn invoke(&self, folder: Option<PathBuf>) -> BoxStream<'static, Vec<Video>> {
        let videos = self.videos.videos().map(Input::Videos);
        let preferences = self
            .preferences
            .app_preferences()
            .into_stream()
            .map(Input::Preferences);

        stream::select(videos, preferences)
            .scan(
                (None::<Vec<Video>>, None::<AppPreferences>),
                move |(latest_videos, latest_prefs), input| {
                    match input {
                        Input::Videos(videos) => *latest_videos = Some(videos),
                        Input::Preferences(prefs) => *latest_prefs = Some(prefs),
                    }

                    let sorted = match (latest_videos.as_ref(), latest_prefs.as_ref()) {
                        (Some(videos), Some(prefs)) => {
                            Some(sort_videos(videos, prefs, folder.as_deref()))
                        }
                        _ => None,
                    };
                    future::ready(Some(sorted))
                },
            )
            .filter_map(future::ready)
            .boxed()
    }
}

fn sort_videos(videos: &[Video], prefs: &AppPreferences, folder: Option<&Path>) -> Vec<Video> {
    let mut selected: Vec<Video> = videos
        .iter()
        .filter(|video| folder.is_none_or(|folder| Path::new(&video.parent_path) == folder))
        .cloned()
        .collect();

    sort_items(&mut selected, prefs.sort_by, prefs.sort_order);
    trace!(
        "Sorted {} video(s) by {:?} {:?}",
        selected.len(),
        prefs.sort_by,
        prefs.sort_order
    );
    selected
}

impl std::fmt::Debug for GetSortedVideos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GetSortedVideos").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FakePreferencesRepository, LocalVideoRepository};
    use crate::datastore::{SortBy, SortOrder};
    use crate::db::repository::VideoStateRepositoryImpl;
    use crate::media::LocalMediaSource;
    use crate::test_utils::{create_test_db, index_with, row};
    use std::time::Duration;
    use tokio::time::timeout;

    fn names(videos: &[Video]) -> Vec<&str> {
        videos.iter().map(|v| v.name.as_str()).collect()
    }

    async fn next(stream: &mut BoxStream<'static, Vec<Video>>) -> Vec<Video> {
        timeout(Duration::from_secs(1), stream.next())
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_sorts_and_resorts_on_preference_change() {
        let db = create_test_db().await.unwrap();
        let index = index_with(vec![
            row(1, "/m/b.mp4", 300, 1),
            row(2, "/m/A.mp4", 100, 3),
            row(3, "/n/c.mp4", 200, 2),
        ]);
        let videos = Arc::new(LocalVideoRepository::new(
            Arc::new(LocalMediaSource::new(index)),
            Arc::new(VideoStateRepositoryImpl::new(db.connection())),
        ));
        let prefs = Arc::new(FakePreferencesRepository::new());
        let use_case = GetSortedVideos::new(videos, prefs.clone());

        let mut stream = use_case.invoke(None);
        assert_eq!(names(&next(&mut stream).await), vec!["A.mp4", "b.mp4", "c.mp4"]);

        prefs.set_sort_by(SortBy::Length).await.unwrap();
        prefs.set_sort_order(SortOrder::Descending).await.unwrap();

        let resorted = loop {
            let emitted = next(&mut stream).await;
            if names(&emitted) == vec!["b.mp4", "c.mp4", "A.mp4"] {
                break emitted;
            }
        };
        assert_eq!(resorted.len(), 3);
    }

    #[tokio::test]
    async fn test_folder_filter_keeps_direct_children() {
        let db = create_test_db().await.unwrap();
        let index = index_with(vec![
            row(1, "/m/a.mp4", 1, 1),
            row(2, "/m/sub/b.mp4", 1, 1),
            row(3, "/n/c.mp4", 1, 1),
        ]);
        let videos = Arc::new(LocalVideoRepository::new(
            Arc::new(LocalMediaSource::new(index)),
            Arc::new(VideoStateRepositoryImpl::new(db.connection())),
        ));
        let use_case = GetSortedVideos::new(videos, Arc::new(FakePreferencesRepository::new()));

        let mut stream = use_case.invoke(Some(PathBuf::from("/m")));
        assert_eq!(names(&next(&mut stream).await), vec!["a.mp4"]);
    }
}
