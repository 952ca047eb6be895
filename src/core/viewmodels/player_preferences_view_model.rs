use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use super::{Property, PropertySubscriber};
use crate::data::PreferencesRepository;
use crate::datastore::{DoubleTapGesture, FastSeek, PlayerPreferences, Resume};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerPreferenceDialog {
    #[default]
    None,
    Resume,
    DoubleTap,
    FastSeek,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerPreferencesUiState {
    pub show_dialog: PlayerPreferenceDialog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerPreferencesEvent {
    ShowDialog(PlayerPreferenceDialog),
}

/// Backs the player settings screen.
pub struct PlayerPreferencesViewModel {
    repository: Arc<dyn PreferencesRepository>,
    ui_state: Property<PlayerPreferencesUiState>,
}

impl std::fmt::Debug for PlayerPreferencesViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerPreferencesViewModel")
            .field("ui_state", &self.ui_state)
            .finish_non_exhaustive()
    }
}

impl PlayerPreferencesViewModel {
    pub fn new(repository: Arc<dyn PreferencesRepository>) -> Self {
        Self {
            repository,
            ui_state: Property::new(PlayerPreferencesUiState::default(), "ui_state"),
        }
    }

    pub fn preferences(&self) -> PropertySubscriber<PlayerPreferences> {
        self.repository.player_preferences()
    }

    pub fn ui_state(&self) -> PropertySubscriber<PlayerPreferencesUiState> {
        self.ui_state.subscribe()
    }

    pub fn on_event(&self, event: PlayerPreferencesEvent) {
        match event {
            PlayerPreferencesEvent::ShowDialog(dialog) => {
                debug!("Showing player preference dialog {:?}", dialog);
                self.ui_state.update(|state| PlayerPreferencesUiState {
                    show_dialog: dialog,
                    ..state.clone()
                });
            }
        }
    }

    fn current(&self) -> PlayerPreferences {
        self.repository.player_preferences().get()
    }

    pub async fn update_playback_resume(&self, resume: Resume) -> Result<()> {
        self.repository.set_playback_resume(resume).await
    }

    pub async fn update_double_tap_gesture(&self, gesture: DoubleTapGesture) -> Result<()> {
        self.repository.set_double_tap_gesture(gesture).await
    }

    pub async fn update_fast_seek(&self, fast_seek: FastSeek) -> Result<()> {
        self.repository.set_fast_seek(fast_seek).await
    }

    pub async fn toggle_double_tap_gesture(&self) -> Result<()> {
        let next = match self.current().double_tap_gesture {
            DoubleTapGesture::None => DoubleTapGesture::FastForwardAndRewind,
            _ => DoubleTapGesture::None,
        };
        self.repository.set_double_tap_gesture(next).await
    }

    pub async fn toggle_fast_seek(&self) -> Result<()> {
        let next = match self.current().fast_seek {
            FastSeek::Disable => FastSeek::Auto,
            _ => FastSeek::Disable,
        };
        self.repository.set_fast_seek(next).await
    }

    pub async fn toggle_remember_brightness_level(&self) -> Result<()> {
        let current = self.current().remember_player_brightness;
        self.repository
            .should_remember_player_brightness(!current)
            .await
    }

    pub async fn toggle_swipe_controls(&self) -> Result<()> {
        let current = self.current().use_swipe_controls;
        self.repository.set_use_swipe_controls(!current).await
    }

    pub async fn toggle_seek_controls(&self) -> Result<()> {
        let current = self.current().use_seek_controls;
        self.repository.set_use_seek_controls(!current).await
    }

    pub async fn toggle_remember_selections(&self) -> Result<()> {
        let current = self.current().remember_selections;
        self.repository.set_remember_selections(!current).await
    }
}
