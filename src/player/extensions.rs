use tracing::{debug, warn};

use super::traits::Player;
use super::types::{SeekParameters, TrackSelectionOverride, TrackType};

/// Track and seek helpers available on every [`Player`].
pub trait PlayerExt: Player {
    /// Switch the active track of `track_type`.
    ///
    /// `Some(-1)` disables the type, `None` re-enables it, and `Some(i)`
    /// selects the first track of the `i`-th group of that type. Only audio
    /// and text tracks can be switched; anything else leaves the parameters
    /// untouched.
    fn switch_track(&self, track_type: TrackType, track_index: Option<i32>) {
        if !matches!(track_type, TrackType::Audio | TrackType::Text) {
            warn!("Cannot switch tracks of type {}", track_type.label());
            return;
        }
        let label = track_type.label();

        let parameters = match track_index {
            Some(-1) => {
                debug!("Disabling {}", label);
                self.track_selection_parameters()
                    .with_track_type_disabled(track_type, true)
            }
            Some(index) => {
                debug!("Setting {} track: {}", label, index);
                let tracks = self.current_tracks();
                let groups = tracks.groups_of(track_type);

                let Some(group) = usize::try_from(index).ok().and_then(|i| groups.get(i)) else {
                    warn!("Invalid {} track index: {}", label, index);
                    return;
                };

                self.track_selection_parameters()
                    .with_track_type_disabled(track_type, false)
                    .with_override(
                        track_type,
                        TrackSelectionOverride {
                            group_id: group.id.clone(),
                            track_index: 0,
                        },
                    )
            }
            None => self
                .track_selection_parameters()
                .with_track_type_disabled(track_type, false),
        };

        self.set_track_selection_parameters(parameters);
    }

    fn seek_back(&self, position_ms: i64, fast_seek: bool) {
        if fast_seek {
            self.set_seek_parameters(SeekParameters::PreviousSync);
        }
        self.seek_to(position_ms);
    }

    fn seek_forward(&self, position_ms: i64, fast_seek: bool) {
        if fast_seek {
            self.set_seek_parameters(SeekParameters::NextSync);
        }
        self.seek_to(position_ms);
    }
}

impl<P: Player + ?Sized> PlayerExt for P {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{TrackGroup, TrackSelectionParameters, Tracks};
    use crate::test_utils::FakePlayer;

    fn player() -> FakePlayer {
        FakePlayer::with_tracks(Tracks::new(vec![
            TrackGroup::new("video-0", TrackType::Video).selected(),
            TrackGroup::new("audio-en", TrackType::Audio).selected(),
            TrackGroup::new("audio-fr", TrackType::Audio),
            TrackGroup::new("text-en", TrackType::Text),
        ]))
    }

    #[test]
    fn test_switch_selects_group_by_type_index() {
        let player = player();
        player.switch_track(TrackType::Audio, Some(1));

        let parameters = player.track_selection_parameters();
        assert_eq!(
            parameters.override_for(TrackType::Audio),
            Some(&TrackSelectionOverride {
                group_id: "audio-fr".to_string(),
                track_index: 0,
            })
        );
        assert!(!parameters.is_disabled(TrackType::Audio));
    }

    #[test]
    fn test_minus_one_disables_and_none_enables() {
        let player = player();

        player.switch_track(TrackType::Text, Some(-1));
        assert!(player.track_selection_parameters().is_disabled(TrackType::Text));

        player.switch_track(TrackType::Text, None);
        assert!(!player.track_selection_parameters().is_disabled(TrackType::Text));
    }

    #[test]
    fn test_invalid_requests_leave_parameters_unchanged() {
        let player = player();
        player.switch_track(TrackType::Audio, Some(5));
        player.switch_track(TrackType::Text, Some(-3));
        player.switch_track(TrackType::Video, Some(-1));

        assert_eq!(player.track_selection_parameters(), TrackSelectionParameters::default());
        assert_eq!(player.parameter_writes(), 0);
    }

    #[test]
    fn test_fast_seek_sets_sync_parameters() {
        let player = player();

        player.seek_back(1000, true);
        assert_eq!(player.seek_parameters(), Some(SeekParameters::PreviousSync));

        player.seek_forward(5000, true);
        assert_eq!(player.seek_parameters(), Some(SeekParameters::NextSync));
        assert_eq!(player.seeks(), vec![1000, 5000]);
    }

    #[test]
    fn test_precise_seek_leaves_parameters_alone() {
        let player = player();
        player.seek_forward(2000, false);
        assert_eq!(player.seek_parameters(), None);
        assert_eq!(player.seeks(), vec![2000]);
    }
}
