//! Commands queued from UI to the scene worker.

use std::path::PathBuf;
use std::time::Duration;

use scene_core::TimerSeq;

use crate::ui::app::ImageSlot;

pub enum SceneCommand {
    ScheduleMessage {
        seq: TimerSeq,
        delay: Duration,
        message: String,
    },
    LoadImage {
        slot: ImageSlot,
        path: PathBuf,
    },
}
