use anyhow::Result;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{Property, PropertySubscriber};
use crate::data::{PreferencesRepository, VideoRepository};
use crate::datastore::Resume;
use crate::player::{Player, PlayerExt, PlayerItem, TrackType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingSelections {
    audio: Option<i32>,
    subtitle: Option<i32>,
}

/// Drives one playback session: restores saved state on start and saves it
/// on stop.
pub struct PlayerViewModel {
    player: Arc<dyn Player>,
    videos: Arc<dyn VideoRepository>,
    preferences: Arc<dyn PreferencesRepository>,
    current_item: Property<Option<PlayerItem>>,
    brightness: Property<f32>,
    pending: Mutex<Option<PendingSelections>>,
}

impl std::fmt::Debug for PlayerViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerViewModel")
            .field("current_item", &self.current_item)
            .field("brightness", &self.brightness)
            .finish_non_exhaustive()
    }
}

impl PlayerViewModel {
    pub fn new(
        player: Arc<dyn Player>,
        videos: Arc<dyn VideoRepository>,
        preferences: Arc<dyn PreferencesRepository>,
    ) -> Self {
        let brightness = preferences.player_preferences().get().player_brightness;
        Self {
            player,
            videos,
            preferences,
            current_item: Property::new(None, "current_item"),
            brightness: Property::new(brightness, "brightness"),
            pending: Mutex::new(None),
        }
    }

    pub fn current_item(&self) -> PropertySubscriber<Option<PlayerItem>> {
        self.current_item.subscribe()
    }

    pub fn brightness(&self) -> PropertySubscriber<f32> {
        self.brightness.subscribe()
    }

    /// Hand `item` to the player and restore whatever was saved for it.
    pub async fn start(&self, item: PlayerItem) -> Result<()> {
        info!("Starting playback of {}", item.path);
        let prefs = self.preferences.player_preferences().get();

        self.player.set_media_item(item.to_media_item());
        self.current_item.set(Some(item.clone()));

        if prefs.remember_player_brightness {
            self.brightness.set(prefs.player_brightness);
        }

        let state = match self.videos.get_video_state(&item.path).await {
            Ok(state) => state,
            Err(e) => {
                warn!("Could not load saved state for {}: {:#}", item.path, e);
                None
            }
        };

        let Some(state) = state else {
            return Ok(());
        };

        if prefs.resume == Resume::Yes && state.position_ms > 0 {
            debug!("Resuming {} at {}ms", item.path, state.position_ms);
            self.player.seek_to(state.position_ms);
        }

        if prefs.remember_selections {
            *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(PendingSelections {
                audio: state.audio_track_index,
                subtitle: state.subtitle_track_index,
            });
        }

        Ok(())
    }

    /// Apply remembered track selections once the engine reports its tracks.
    pub fn on_tracks_changed(&self) {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(selections) = pending {
            if let Some(audio) = selections.audio {
                self.player.switch_track(TrackType::Audio, Some(audio));
            }
            if let Some(subtitle) = selections.subtitle {
                self.player.switch_track(TrackType::Text, Some(subtitle));
            }
        }
    }

    fn selected_track(&self, track_type: TrackType) -> Option<i32> {
        if self
            .player
            .track_selection_parameters()
            .is_disabled(track_type)
        {
            return Some(-1);
        }
        self.player.current_tracks().selected_index(track_type)
    }

    /// Save position and, when enabled, track selections and brightness.
    pub async fn stop(&self) -> Result<()> {
        let Some(item) = self.current_item.get() else {
            return Ok(());
        };
        let prefs = self.preferences.player_preferences().get();
        let position_ms = self.player.current_position().as_millis() as i64;

        let (audio, subtitle) = if prefs.remember_selections {
            (
                self.selected_track(TrackType::Audio),
                self.selected_track(TrackType::Text),
            )
        } else {
            (None, None)
        };

        self.videos
            .save_video_state(&item.path, position_ms, audio, subtitle)
            .await?;

        if prefs.remember_player_brightness {
            self.preferences
                .set_player_brightness(self.brightness.get())
                .await?;
        }

        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.current_item.set(None);
        Ok(())
    }

    pub async fn set_brightness(&self, value: f32) -> Result<()> {
        if !value.is_finite() {
            warn!("Ignoring non-finite brightness {}", value);
            return Ok(());
        }
        let value = value.clamp(0.0, 1.0);
        self.brightness.set(value);

        if self.preferences.player_preferences().get().remember_player_brightness {
            self.preferences.set_player_brightness(value).await?;
        }
        Ok(())
    }

    /// Seek relative to the current position, snapping to sync frames when
    /// fast seek applies to this video.
    pub fn seek_by(&self, offset: Duration, forward: bool) {
        let duration = self
            .player
            .duration()
            .or_else(|| {
                self.current_item
                    .get()
                    .map(|item| Duration::from_millis(item.duration_ms.max(0) as u64))
            })
            .unwrap_or_default();
        let fast = self
            .preferences
            .player_preferences()
            .get()
            .fast_seek
            .is_enabled_for(duration);

        let position = self.player.current_position();
        if forward {
            let target = position.saturating_add(offset);
            let target = if duration.is_zero() { target } else { target.min(duration) };
            self.player.seek_forward(target.as_millis() as i64, fast);
        } else {
            let target = position.saturating_sub(offset);
            self.player.seek_back(target.as_millis() as i64, fast);
        }
    }
}
