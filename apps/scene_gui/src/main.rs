use anyhow::Context as _;
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

mod controller;
mod scene_bridge;
mod ui;

use controller::events::UiEvent;
use scene_bridge::commands::SceneCommand;
use ui::{SceneApp, StartupConfig};

#[derive(Debug, Parser)]
#[command(name = "scene_gui", about = "Interactive reading-room scene")]
struct Cli {
    /// Directory holding the scene images.
    #[arg(long, default_value = "assets")]
    asset_dir: std::path::PathBuf,

    /// Tracing filter, e.g. `info` or `scene_gui=debug`.
    #[arg(long, default_value = "info")]
    log_filter: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_new(&cli.log_filter)
        .with_context(|| format!("invalid log filter {:?}", cli.log_filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (cmd_tx, cmd_rx) = bounded::<SceneCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    scene_bridge::runtime::launch(cmd_rx, ui_tx);

    let startup = StartupConfig {
        asset_dir: cli.asset_dir,
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Reading Room")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Reading Room",
        options,
        Box::new(|cc| {
            let persisted = cc.storage.and_then(|storage| {
                storage
                    .get_string(ui::app::SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<ui::app::SceneSettings>(&text).ok())
            });
            Ok(Box::new(SceneApp::bootstrap(cmd_tx, ui_rx, persisted, startup)))
        }),
    )
    .map_err(|err| anyhow::anyhow!("eframe exited with an error: {err}"))
}
