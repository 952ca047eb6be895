pub mod player_preferences_view_model;
pub mod player_view_model;
pub mod property;
pub mod video_picker_view_model;

pub use player_preferences_view_model::{
    PlayerPreferenceDialog, PlayerPreferencesEvent, PlayerPreferencesUiState,
    PlayerPreferencesViewModel,
};
pub use player_view_model::PlayerViewModel;
pub use property::{ComputedProperty, Property, PropertySubscriber};
pub use video_picker_view_model::{MediaState, PickerContent, VideoPickerViewModel};

/// Screen-level state holder with an explicit lifecycle.
#[async_trait::async_trait]
pub trait ViewModel: Send + Sync {
    async fn initialize(&self);

    async fn refresh(&self);

    fn dispose(&self);
}
