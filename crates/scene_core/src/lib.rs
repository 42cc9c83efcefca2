//! Dialog controller for the reading-room scene.
//!
//! Everything interactive in the scene is driven by one state record
//! ([`SceneState`]), one event enum ([`SceneEvent`]), and a pure reducer
//! ([`reduce`]). Rendering is a projection of the state record; anything that
//! must happen outside it (timers, navigation) comes back as an [`Effect`] for
//! the shell to run.

pub mod domain;
pub mod reducer;
pub mod script;

pub use domain::{DialogOption, DialogState, LibrarianState, TimerSeq};
pub use reducer::{reduce, Effect, SceneEvent, SceneState, MESSAGE_DELAY};

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;
