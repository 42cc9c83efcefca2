//! UI layer for the scene shell.

pub mod app;

pub use app::{SceneApp, StartupConfig};
