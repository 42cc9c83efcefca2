//! Command dispatch helpers from UI interactions to the worker queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::scene_bridge::commands::SceneCommand;

pub fn dispatch_scene_command(
    cmd_tx: &Sender<SceneCommand>,
    cmd: SceneCommand,
    status: &mut String,
) {
    let cmd_name = match &cmd {
        SceneCommand::ScheduleMessage { .. } => "schedule_message",
        SceneCommand::LoadImage { .. } => "load_image",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->worker command"),
        Err(TrySendError::Full(_)) => {
            *status = "Scene worker queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Scene worker disconnected; restart the app".to_string();
        }
    }
}
