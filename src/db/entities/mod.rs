pub mod video_state;

pub use video_state::{
    ActiveModel as VideoStateActiveModel, Entity as VideoState, Model as VideoStateModel,
};
