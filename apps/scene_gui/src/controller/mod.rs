//! Controller layer: worker events and command orchestration for the scene
//! shell.

pub mod events;
pub mod orchestration;
