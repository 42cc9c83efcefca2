//! Worker->UI events for the scene shell.

use scene_core::TimerSeq;

use crate::ui::app::{ImageSlot, SceneImage};

pub enum UiEvent {
    MessageTimerElapsed {
        seq: TimerSeq,
        message: String,
    },
    SceneImageLoaded {
        slot: ImageSlot,
        image: SceneImage,
    },
    SceneImageFailed {
        slot: ImageSlot,
        reason: String,
    },
}
