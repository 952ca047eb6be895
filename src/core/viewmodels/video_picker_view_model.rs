use anyhow::Result;
use async_trait::async_trait;
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{ComputedProperty, Property, PropertySubscriber, ViewModel};
use crate::data::{PreferencesRepository, Video};
use crate::datastore::{AppPreferences, SortBy, SortOrder};
use crate::domain::{Folder, GetSortedVideos, group_by_folder, sort_folders};

/// Quiet period before a new library snapshot is rendered.
const RENDER_DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerContent {
    Videos(Vec<Video>),
    Folders(Vec<Folder>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MediaState {
    #[default]
    Loading,
    Success(PickerContent),
}

/// Backs the library screen, optionally scoped to one folder.
pub struct VideoPickerViewModel {
    get_sorted_videos: GetSortedVideos,
    preferences: Arc<dyn PreferencesRepository>,
    folder: Option<PathBuf>,
    latest: Property<MediaState>,
    media_state: ComputedProperty<MediaState>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for VideoPickerViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoPickerViewModel")
            .field("folder", &self.folder)
            .field("media_state", &"ComputedProperty<MediaState>")
            .finish()
    }
}

impl VideoPickerViewModel {
    /// Must be called from within a tokio runtime.
    pub fn new(
        get_sorted_videos: GetSortedVideos,
        preferences: Arc<dyn PreferencesRepository>,
        folder: Option<PathBuf>,
    ) -> Self {
        let latest = Property::new(MediaState::Loading, "media_state");
        let media_state = latest.debounce(RENDER_DEBOUNCE);

        Self {
            get_sorted_videos,
            preferences,
            folder,
            latest,
            media_state,
            task: Mutex::new(None),
        }
    }

    pub fn folder(&self) -> Option<&PathBuf> {
        self.folder.as_ref()
    }

    pub fn media_state(&self) -> PropertySubscriber<MediaState> {
        self.media_state.subscribe()
    }

    pub fn app_preferences(&self) -> PropertySubscriber<AppPreferences> {
        self.preferences.app_preferences()
    }

    /// Apply the quick settings dialog.
    pub async fn update_menu(
        &self,
        sort_by: SortBy,
        sort_order: SortOrder,
        group_videos_by_folder: bool,
    ) -> Result<()> {
        self.preferences.set_sort_by(sort_by).await?;
        self.preferences.set_sort_order(sort_order).await?;
        self.preferences
            .set_group_videos_by_folder(group_videos_by_folder)
            .await?;
        Ok(())
    }

    fn start(&self) {
        let mut videos = self.get_sorted_videos.invoke(self.folder.clone());
        let preferences = self.preferences.clone();
        let show_folders = self.folder.is_none();
        let latest = self.latest.clone();

        let handle = tokio::spawn(async move {
            while let Some(videos) = videos.next().await {
                let prefs = preferences.app_preferences().get();
                let content = if show_folders && prefs.group_videos_by_folder {
                    PickerContent::Folders(sort_folders(
                        group_by_folder(&videos),
                        prefs.sort_by,
                        prefs.sort_order,
                    ))
                } else {
                    PickerContent::Videos(videos)
                };
                latest.set(MediaState::Success(content));
            }
            debug!("Video picker stream ended");
        });

        if let Some(previous) = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle)
        {
            previous.abort();
        }
    }
}

#[async_trait]
impl ViewModel for VideoPickerViewModel {
    async fn initialize(&self) {
        info!("Initializing video picker for {:?}", self.folder);
        self.start();
    }

    async fn refresh(&self) {
        self.latest.set(MediaState::Loading);
        self.start();
    }

    fn dispose(&self) {
        if let Some(task) = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
    }
}

impl Drop for VideoPickerViewModel {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FakePreferencesRepository, LocalVideoRepository};
    use crate::db::repository::VideoStateRepositoryImpl;
    use crate::media::LocalMediaSource;
    use crate::test_utils::common::wait_for_async;
    use crate::test_utils::{TestDatabase, create_test_db, index_with, row};

    async fn view_model(
        folder: Option<PathBuf>,
    ) -> (VideoPickerViewModel, Arc<FakePreferencesRepository>, TestDatabase) {
        let db = create_test_db().await.unwrap();
        let index = index_with(vec![
            row(1, "/m/b.mp4", 10, 1),
            row(2, "/m/a.mp4", 20, 2),
            row(3, "/n/c.mp4", 30, 3),
        ]);
        let videos = Arc::new(LocalVideoRepository::new(
            Arc::new(LocalMediaSource::new(index)),
            Arc::new(VideoStateRepositoryImpl::new(db.connection())),
        ));
        let prefs = Arc::new(FakePreferencesRepository::new());
        let vm = VideoPickerViewModel::new(
            GetSortedVideos::new(videos, prefs.clone()),
            prefs.clone(),
            folder,
        );
        (vm, prefs, db)
    }

    async fn wait_for_state(
        vm: &VideoPickerViewModel,
        expected: impl Fn(&MediaState) -> bool,
    ) -> bool {
        let subscriber = vm.media_state();
        wait_for_async(
            || {
                let state = subscriber.get();
                let matched = expected(&state);
                async move { matched }
            },
            Duration::from_secs(2),
        )
        .await
    }

    #[tokio::test]
    async fn test_starts_loading_then_shows_folders() {
        let (vm, _prefs, _db) = view_model(None).await;
        assert_eq!(vm.media_state().get(), MediaState::Loading);

        vm.initialize().await;

        assert!(
            wait_for_state(&vm, |state| matches!(
                state,
                MediaState::Success(PickerContent::Folders(folders)) if folders.len() == 2
            ))
            .await
        );
    }

    #[tokio::test]
    async fn test_ungrouped_menu_shows_sorted_videos() {
        let (vm, _prefs, _db) = view_model(None).await;
        vm.initialize().await;

        vm.update_menu(SortBy::Length, SortOrder::Descending, false)
            .await
            .unwrap();

        assert!(
            wait_for_state(&vm, |state| match state {
                MediaState::Success(PickerContent::Videos(videos)) => {
                    videos.iter().map(|v| v.name.as_str()).collect::<Vec<_>>()
                        == vec!["c.mp4", "a.mp4", "b.mp4"]
                }
                _ => false,
            })
            .await
        );
    }

    #[tokio::test]
    async fn test_folder_scope_lists_videos_even_when_grouping() {
        let (vm, prefs, _db) = view_model(Some(PathBuf::from("/m"))).await;
        assert!(prefs.app_preferences().get().group_videos_by_folder);

        vm.initialize().await;

        assert!(
            wait_for_state(&vm, |state| matches!(
                state,
                MediaState::Success(PickerContent::Videos(videos)) if videos.len() == 2
            ))
            .await
        );
    }
}
