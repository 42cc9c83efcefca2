//! Worker runtime: sleeps out message timers and decodes scene images, then
//! reports back over the UI event queue.

use std::{fs, path::Path, thread};

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

use crate::controller::events::UiEvent;
use crate::scene_bridge::commands::SceneCommand;
use crate::ui::app::SceneImage;

#[derive(Debug, Error)]
enum ImageLoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

pub fn launch(cmd_rx: Receiver<SceneCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || worker_loop(cmd_rx, ui_tx));
}

fn worker_loop(cmd_rx: Receiver<SceneCommand>, ui_tx: Sender<UiEvent>) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            SceneCommand::ScheduleMessage {
                seq,
                delay,
                message,
            } => {
                // Each timer sleeps on its own thread so concurrent timers
                // never queue behind one another. Stale fires are discarded by
                // seq in the reducer, so no cancellation plumbing is needed
                // here.
                let ui_tx = ui_tx.clone();
                thread::spawn(move || {
                    thread::sleep(delay);
                    let _ = ui_tx.try_send(UiEvent::MessageTimerElapsed { seq, message });
                });
            }
            SceneCommand::LoadImage { slot, path } => {
                let event = match load_scene_image(&path) {
                    Ok(image) => UiEvent::SceneImageLoaded { slot, image },
                    Err(err) => {
                        tracing::warn!(slot = slot.label(), error = %err, "scene image load failed");
                        UiEvent::SceneImageFailed {
                            slot,
                            reason: err.to_string(),
                        }
                    }
                };
                let _ = ui_tx.try_send(event);
            }
        }
    }
}

fn load_scene_image(path: &Path) -> Result<SceneImage, ImageLoadError> {
    let bytes = fs::read(path).map_err(|source| ImageLoadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let decoded = image::load_from_memory(&bytes).map_err(|source| ImageLoadError::Decode {
        path: path.display().to_string(),
        source,
    })?;
    let rgba = decoded.to_rgba8();
    Ok(SceneImage {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        rgba: rgba.into_raw(),
    })
}
