use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::viewmodels::{Property, PropertySubscriber};
use crate::datastore::{
    AppPreferences, AppPreferencesSerializer, DataStore, DoubleTapGesture, FastSeek, LoadStatus,
    PlayerPreferences, PlayerPreferencesSerializer, Resume, SortBy, SortOrder, ThemeConfig,
};

pub const APP_PREFERENCES_FILE: &str = "app_preferences.json";
pub const PLAYER_PREFERENCES_FILE: &str = "player_preferences.json";

type AppUpdate = Box<dyn FnOnce(&AppPreferences) -> AppPreferences + Send>;
type PlayerUpdate = Box<dyn FnOnce(&PlayerPreferences) -> PlayerPreferences + Send>;

/// App and player preferences as reactive snapshots with one setter per
/// field. Every setter replaces exactly one field of the current snapshot.
#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    fn app_preferences(&self) -> PropertySubscriber<AppPreferences>;

    fn player_preferences(&self) -> PropertySubscriber<PlayerPreferences>;

    async fn update_app_preferences(&self, transform: AppUpdate) -> Result<AppPreferences>;

    async fn update_player_preferences(
        &self,
        transform: PlayerUpdate,
    ) -> Result<PlayerPreferences>;

    async fn set_sort_order(&self, sort_order: SortOrder) -> Result<()> {
        self.update_app_preferences(Box::new(move |p| AppPreferences {
            sort_order,
            ..p.clone()
        }))
        .await?;
        Ok(())
    }

    async fn set_sort_by(&self, sort_by: SortBy) -> Result<()> {
        self.update_app_preferences(Box::new(move |p| AppPreferences {
            sort_by,
            ..p.clone()
        }))
        .await?;
        Ok(())
    }

    async fn set_group_videos_by_folder(&self, value: bool) -> Result<()> {
        self.update_app_preferences(Box::new(move |p| AppPreferences {
            group_videos_by_folder: value,
            ..p.clone()
        }))
        .await?;
        Ok(())
    }

    async fn set_theme_config(&self, theme_config: ThemeConfig) -> Result<()> {
        self.update_app_preferences(Box::new(move |p| AppPreferences {
            theme_config,
            ..p.clone()
        }))
        .await?;
        Ok(())
    }

    async fn set_use_dynamic_colors(&self, value: bool) -> Result<()> {
        self.update_app_preferences(Box::new(move |p| AppPreferences {
            use_dynamic_colors: value,
            ..p.clone()
        }))
        .await?;
        Ok(())
    }

    async fn set_playback_resume(&self, resume: Resume) -> Result<()> {
        self.update_player_preferences(Box::new(move |p| PlayerPreferences {
            resume,
            ..p.clone()
        }))
        .await?;
        Ok(())
    }

    async fn should_remember_player_brightness(&self, value: bool) -> Result<()> {
        self.update_player_preferences(Box::new(move |p| PlayerPreferences {
            remember_player_brightness: value,
            ..p.clone()
        }))
        .await?;
        Ok(())
    }

    /// Finite values are clamped to [0, 1]; NaN and infinities are ignored.
    async fn set_player_brightness(&self, value: f32) -> Result<()> {
        if !value.is_finite() {
            warn!("Ignoring non-finite player brightness {}", value);
            return Ok(());
        }
        let value = value.clamp(0.0, 1.0);
        self.update_player_preferences(Box::new(move |p| PlayerPreferences {
            player_brightness: value,
            ..p.clone()
        }))
        .await?;
        Ok(())
    }

    async fn set_double_tap_gesture(&self, gesture: DoubleTapGesture) -> Result<()> {
        self.update_player_preferences(Box::new(move |p| PlayerPreferences {
            double_tap_gesture: gesture,
            ..p.clone()
        }))
        .await?;
        Ok(())
    }

    async fn set_fast_seek(&self, fast_seek: FastSeek) -> Result<()> {
        self.update_player_preferences(Box::new(move |p| PlayerPreferences {
            fast_seek,
            ..p.clone()
        }))
        .await?;
        Ok(())
    }

    async fn set_use_swipe_controls(&self, value: bool) -> Result<()> {
        self.update_player_preferences(Box::new(move |p| PlayerPreferences {
            use_swipe_controls: value,
            ..p.clone()
        }))
        .await?;
        Ok(())
    }

    async fn set_use_seek_controls(&self, value: bool) -> Result<()> {
        self.update_player_preferences(Box::new(move |p| PlayerPreferences {
            use_seek_controls: value,
            ..p.clone()
        }))
        .await?;
        Ok(())
    }

    async fn set_remember_selections(&self, value: bool) -> Result<()> {
        self.update_player_preferences(Box::new(move |p| PlayerPreferences {
            remember_selections: value,
            ..p.clone()
        }))
        .await?;
        Ok(())
    }
}

/// Preferences persisted as two JSON documents under `<data_dir>/datastore`.
#[derive(Debug)]
pub struct LocalPreferencesRepository {
    app: DataStore<AppPreferences>,
    player: DataStore<PlayerPreferences>,
    app_status: LoadStatus,
    player_status: LoadStatus,
}

impl LocalPreferencesRepository {
    pub fn datastore_dir(data_dir: &Path) -> PathBuf {
        data_dir.join("datastore")
    }

    /// Open both documents. A corrupt document falls back to defaults and is
    /// reported through [`Self::app_load_status`] / [`Self::player_load_status`].
    pub async fn open(data_dir: &Path) -> Result<Self> {
        let dir = Self::datastore_dir(data_dir);
        info!("Opening preferences in {:?}", dir);

        let (app, app_status) =
            DataStore::open(dir.join(APP_PREFERENCES_FILE), AppPreferencesSerializer::new())
                .await
                .context("Failed to open app preferences")?;
        let (player, player_status) = DataStore::open(
            dir.join(PLAYER_PREFERENCES_FILE),
            PlayerPreferencesSerializer::new(),
        )
        .await
        .context("Failed to open player preferences")?;

        for (name, status) in [("app", &app_status), ("player", &player_status)] {
            if let LoadStatus::Recovered(e) = status {
                warn!("Reset {} preferences to defaults: {}", name, e);
            }
        }

        Ok(Self {
            app,
            player,
            app_status,
            player_status,
        })
    }

    pub fn app_load_status(&self) -> &LoadStatus {
        &self.app_status
    }

    pub fn player_load_status(&self) -> &LoadStatus {
        &self.player_status
    }
}

#[async_trait]
impl PreferencesRepository for LocalPreferencesRepository {
    fn app_preferences(&self) -> PropertySubscriber<AppPreferences> {
        self.app.data()
    }

    fn player_preferences(&self) -> PropertySubscriber<PlayerPreferences> {
        self.player.data()
    }

    async fn update_app_preferences(&self, transform: AppUpdate) -> Result<AppPreferences> {
        let updated = self
            .app
            .update(transform)
            .await
            .context("Failed to persist app preferences")?;
        debug!("App preferences updated: {:?}", updated);
        Ok(updated)
    }

    async fn update_player_preferences(
        &self,
        transform: PlayerUpdate,
    ) -> Result<PlayerPreferences> {
        let updated = self
            .player
            .update(transform)
            .await
            .context("Failed to persist player preferences")?;
        debug!("Player preferences updated: {:?}", updated);
        Ok(updated)
    }
}

/// In-memory preferences for tests and embedding without a data directory.
#[derive(Debug)]
pub struct FakePreferencesRepository {
    app: Property<AppPreferences>,
    player: Property<PlayerPreferences>,
}

impl FakePreferencesRepository {
    pub fn new() -> Self {
        Self::with(AppPreferences::default(), PlayerPreferences::default())
    }

    pub fn with(app: AppPreferences, player: PlayerPreferences) -> Self {
        Self {
            app: Property::new(app, "app_preferences"),
            player: Property::new(player, "player_preferences"),
        }
    }
}

impl Default for FakePreferencesRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreferencesRepository for FakePreferencesRepository {
    fn app_preferences(&self) -> PropertySubscriber<AppPreferences> {
        self.app.subscribe()
    }

    fn player_preferences(&self) -> PropertySubscriber<PlayerPreferences> {
        self.player.subscribe()
    }

    async fn update_app_preferences(&self, transform: AppUpdate) -> Result<AppPreferences> {
        Ok(self.app.update(transform))
    }

    async fn update_player_preferences(
        &self,
        transform: PlayerUpdate,
    ) -> Result<PlayerPreferences> {
        Ok(self.player.update(transform))
    }
}
