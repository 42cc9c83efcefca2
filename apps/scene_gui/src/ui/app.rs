use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};

use scene_core::{
    reduce, script, DialogOption, DialogState, Effect, LibrarianState, SceneEvent, SceneState,
};

use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_scene_command;
use crate::scene_bridge::commands::SceneCommand;

pub(crate) const SETTINGS_STORAGE_KEY: &str = "scene_settings_v1";

const FULL_UV: egui::Rect = egui::Rect {
    min: egui::Pos2 { x: 0.0, y: 0.0 },
    max: egui::Pos2 { x: 1.0, y: 1.0 },
};

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub asset_dir: PathBuf,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
        }
    }
}

/// The three fixed scene images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    Background,
    Librarian,
    Assignment,
}

impl ImageSlot {
    pub const ALL: [ImageSlot; 3] = [Self::Background, Self::Librarian, Self::Assignment];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Background => "reading_room.jpg",
            Self::Librarian => "librarian.png",
            Self::Assignment => "assignment.jpg",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Librarian => "librarian",
            Self::Assignment => "assignment",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScenePaths {
    pub background: PathBuf,
    pub librarian: PathBuf,
    pub assignment: PathBuf,
}

impl ScenePaths {
    pub fn from_startup(startup: &StartupConfig) -> Self {
        let root = &startup.asset_dir;
        Self {
            background: root.join(ImageSlot::Background.file_name()),
            librarian: root.join(ImageSlot::Librarian.file_name()),
            assignment: root.join(ImageSlot::Assignment.file_name()),
        }
    }

    fn for_slot(&self, slot: ImageSlot) -> &Path {
        match slot {
            ImageSlot::Background => &self.background,
            ImageSlot::Librarian => &self.librarian,
            ImageSlot::Assignment => &self.assignment,
        }
    }
}

/// Decoded RGBA pixels handed back by the worker.
#[derive(Clone, Debug)]
pub struct SceneImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

enum SceneImageState {
    NotRequested,
    Loading,
    Ready {
        image: SceneImage,
        texture: Option<egui::TextureHandle>,
    },
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub text_scale: f32,
    pub show_hotspot_hints: bool,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            text_scale: 1.0,
            show_hotspot_hints: true,
        }
    }
}

impl SceneSettings {
    fn clamped(self) -> Self {
        Self {
            text_scale: self.text_scale.clamp(0.8, 1.4),
            show_hotspot_hints: self.show_hotspot_hints,
        }
    }
}

pub struct SceneApp {
    cmd_tx: Sender<SceneCommand>,
    ui_rx: Receiver<UiEvent>,

    state: SceneState,
    paths: ScenePaths,
    images: HashMap<ImageSlot, SceneImageState>,

    settings: SceneSettings,
    applied_text_scale: Option<f32>,
    settings_open: bool,
    other_input_autofocused: bool,

    status: String,
}

impl SceneApp {
    pub fn bootstrap(
        cmd_tx: Sender<SceneCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted: Option<SceneSettings>,
        startup: StartupConfig,
    ) -> Self {
        let paths = ScenePaths::from_startup(&startup);
        Self {
            cmd_tx,
            ui_rx,
            state: SceneState::new(),
            paths,
            images: HashMap::new(),
            settings: persisted.unwrap_or_default().clamped(),
            applied_text_scale: None,
            settings_open: false,
            other_input_autofocused: false,
            status: String::new(),
        }
    }

    /// Run one event through the reducer and execute whatever it asks for.
    fn apply(&mut self, event: SceneEvent) {
        for effect in reduce(&mut self.state, event) {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleMessage {
                seq,
                delay,
                message,
            } => {
                dispatch_scene_command(
                    &self.cmd_tx,
                    SceneCommand::ScheduleMessage {
                        seq,
                        delay,
                        message,
                    },
                    &mut self.status,
                );
            }
            Effect::OpenExternal { url } => self.open_external(url),
        }
    }

    fn open_external(&mut self, url: &str) {
        #[cfg(target_os = "windows")]
        let result = std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .spawn();

        #[cfg(target_os = "macos")]
        let result = std::process::Command::new("open").arg(url).spawn();

        #[cfg(all(unix, not(target_os = "macos")))]
        let result = std::process::Command::new("xdg-open").arg(url).spawn();

        if let Err(err) = result {
            self.status = format!("Failed to open {url}: {err}");
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::MessageTimerElapsed { seq, message } => {
                    self.apply(SceneEvent::MessageTimerElapsed { seq, message });
                }
                UiEvent::SceneImageLoaded { slot, image } => {
                    self.images.insert(
                        slot,
                        SceneImageState::Ready {
                            image,
                            texture: None,
                        },
                    );
                }
                UiEvent::SceneImageFailed { slot, reason } => {
                    self.images.insert(slot, SceneImageState::Error(reason));
                }
            }
        }
    }

    fn request_missing_images(&mut self) {
        let missing: Vec<ImageSlot> = ImageSlot::ALL
            .iter()
            .copied()
            .filter(|slot| {
                self.images
                    .get(slot)
                    .map_or(true, |state| matches!(state, SceneImageState::NotRequested))
            })
            .collect();

        for slot in missing {
            self.images.insert(slot, SceneImageState::Loading);
            let path = self.paths.for_slot(slot).to_path_buf();
            dispatch_scene_command(
                &self.cmd_tx,
                SceneCommand::LoadImage { slot, path },
                &mut self.status,
            );
        }
    }

    fn any_image_loading(&self) -> bool {
        self.images
            .values()
            .any(|state| matches!(state, SceneImageState::Loading))
    }

    fn texture_for(
        &mut self,
        ctx: &egui::Context,
        slot: ImageSlot,
    ) -> Option<egui::TextureHandle> {
        match self.images.get_mut(&slot)? {
            SceneImageState::Ready { image, texture } => {
                if texture.is_none() {
                    let color = egui::ColorImage::from_rgba_unmultiplied(
                        [image.width, image.height],
                        &image.rgba,
                    );
                    *texture = Some(ctx.load_texture(
                        format!("scene:{}", slot.label()),
                        color,
                        egui::TextureOptions::LINEAR,
                    ));
                }
                texture.clone()
            }
            _ => None,
        }
    }

    fn image_error(&self, slot: ImageSlot) -> Option<&str> {
        match self.images.get(&slot) {
            Some(SceneImageState::Error(reason)) => Some(reason),
            _ => None,
        }
    }

    fn apply_text_scale_if_needed(&mut self, ctx: &egui::Context) {
        if self.applied_text_scale == Some(self.settings.text_scale) {
            return;
        }

        let mut style = (*ctx.style()).clone();
        style.text_styles = scaled_text_styles(self.settings.text_scale);
        ctx.set_style(style);
        self.applied_text_scale = Some(self.settings.text_scale);
    }

    // ---------- scene layers ----------

    fn paint_background(&mut self, ui: &mut egui::Ui) {
        let rect = ui.max_rect();
        let ctx = ui.ctx().clone();
        if let Some(texture) = self.texture_for(&ctx, ImageSlot::Background) {
            let uv = cover_uv(texture.size_vec2(), rect.aspect_ratio());
            ui.painter()
                .image(texture.id(), rect, uv, egui::Color32::WHITE);
        } else {
            ui.painter()
                .rect_filled(rect, 0.0, egui::Color32::from_rgb(38, 34, 28));
            if let Some(reason) = self.image_error(ImageSlot::Background) {
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    format!("background unavailable: {reason}"),
                    egui::FontId::proportional(14.0),
                    egui::Color32::GRAY,
                );
            }
        }
    }

    fn paint_librarian(&mut self, ui: &mut egui::Ui) {
        if self.state.librarian == LibrarianState::Hidden {
            return;
        }

        let rect = ui.max_rect();
        let ctx = ui.ctx().clone();
        let Some(texture) = self.texture_for(&ctx, ImageSlot::Librarian) else {
            if self.image_error(ImageSlot::Librarian).is_some() {
                ui.painter().text(
                    egui::pos2(rect.right() - 140.0, rect.bottom() - 80.0),
                    egui::Align2::CENTER_CENTER,
                    "(the librarian stands here)",
                    egui::FontId::proportional(14.0),
                    egui::Color32::LIGHT_GRAY,
                );
            }
            return;
        };

        let size = texture.size_vec2();
        let height = rect.height() * 0.55;
        let width = height * size.x / size.y;
        let sprite = egui::Rect::from_min_max(
            egui::pos2(rect.right() - width - 32.0, rect.bottom() - height),
            egui::pos2(rect.right() - 32.0, rect.bottom()),
        );
        ui.painter()
            .image(texture.id(), sprite, FULL_UV, egui::Color32::WHITE);
    }

    fn show_hotspots(&mut self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("scene_back"))
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(16.0, 16.0))
            .show(ctx, |ui| {
                round_widget_corners(ui, 20);
                let button = egui::Button::new(egui::RichText::new("←").size(22.0))
                    .min_size(egui::vec2(40.0, 40.0));
                let mut response = ui.add(button);
                if self.settings.show_hotspot_hints {
                    response = response.on_hover_text("Leave the library");
                }
                if response.clicked() {
                    self.apply(SceneEvent::BackRequested);
                }
            });

        egui::Area::new(egui::Id::new("scene_coffee"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-128.0, 20.0))
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("☕").size(26.0));
            });

        egui::Area::new(egui::Id::new("scene_mail"))
            .anchor(egui::Align2::LEFT_CENTER, egui::vec2(16.0, 0.0))
            .show(ctx, |ui| {
                round_widget_corners(ui, 22);
                let button = egui::Button::new(egui::RichText::new("✉").size(22.0))
                    .min_size(egui::vec2(44.0, 44.0));
                let mut response = ui.add(button);
                if self.settings.show_hotspot_hints {
                    response = response.on_hover_text("Student mail");
                }
                if response.clicked() {
                    self.apply(SceneEvent::MailClicked);
                }
            });
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        if self.state.dialog == DialogState::Hidden {
            return;
        }

        let frame = egui::Frame::NONE
            .fill(egui::Color32::from_rgba_unmultiplied(22, 26, 34, 238))
            .stroke(egui::Stroke::new(1.5, egui::Color32::from_rgb(96, 130, 182)))
            .corner_radius(egui::CornerRadius::same(14))
            .inner_margin(egui::Margin::symmetric(18, 14));

        egui::Window::new("librarian_dialog")
            .title_bar(false)
            .frame(frame)
            .resizable(false)
            .default_width(420.0)
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -72.0))
            .show(ctx, |ui| {
                ui.set_max_width(420.0);
                round_widget_corners(ui, 8);
                match self.state.dialog {
                    DialogState::Initial | DialogState::Options => self.show_greeting_panel(ui),
                    DialogState::Introduction => self.show_introduction_panel(ui),
                    DialogState::OtherInput => self.show_other_input_panel(ui),
                    DialogState::Hidden => {}
                }
            });
    }

    fn show_greeting_panel(&mut self, ui: &mut egui::Ui) {
        let mut chosen = None;
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new(self.state.message.as_str())
                    .size(16.0)
                    .strong(),
            );
            if self.state.options_visible() {
                ui.add_space(8.0);
                for option in DialogOption::ALL {
                    let clicked = ui
                        .add_sized(
                            [ui.available_width(), 30.0],
                            egui::Button::new(option.label()),
                        )
                        .clicked();
                    if clicked {
                        chosen = Some(option);
                    }
                }
            }
        });
        if let Some(option) = chosen {
            self.apply(SceneEvent::OptionChosen(option));
        }
    }

    fn show_introduction_panel(&mut self, ui: &mut egui::Ui) {
        let mut continue_clicked = false;
        ui.vertical_centered(|ui| {
            if self.state.show_introduction {
                ui.label(egui::RichText::new(script::INTRODUCTION).size(14.0));
                ui.add_space(8.0);
                continue_clicked = ui.button("Continue").clicked();
            } else {
                ui.label(egui::RichText::new(script::INTRODUCTION_PLACEHOLDER).size(16.0));
            }
        });
        if continue_clicked {
            self.apply(SceneEvent::IntroductionContinued);
        }
    }

    fn show_other_input_panel(&mut self, ui: &mut egui::Ui) {
        let mut submit = false;
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new(script::OTHER_PROMPT)
                    .size(16.0)
                    .strong(),
            );
            ui.add_space(6.0);

            let edit = egui::TextEdit::singleline(&mut self.state.other_input)
                .id_salt("other_request")
                .hint_text("Type your request here...")
                .desired_width(f32::INFINITY);
            let response = ui.add(edit);

            if !self.other_input_autofocused {
                response.request_focus();
                self.other_input_autofocused = true;
            }

            let enter_pressed = ui.input(|i| i.key_pressed(egui::Key::Enter));
            if response.lost_focus() && enter_pressed {
                submit = true;
            }

            ui.add_space(6.0);
            if ui.button("Submit").clicked() {
                submit = true;
            }
        });
        if submit {
            self.apply(SceneEvent::OtherSubmitted);
        }
    }

    fn show_assignment_modal(&mut self, ctx: &egui::Context) {
        if !self.state.show_assignment {
            return;
        }

        let screen = ctx.screen_rect();
        let texture = self.texture_for(ctx, ImageSlot::Assignment);

        egui::Area::new(egui::Id::new("assignment_modal"))
            .order(egui::Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                ui.painter()
                    .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(192));

                let sheet = match &texture {
                    Some(texture) => {
                        let size = texture.size_vec2();
                        let max = screen.size() * 0.82;
                        let scale = (max.x / size.x).min(max.y / size.y).min(1.0);
                        egui::Rect::from_center_size(screen.center(), size * scale)
                    }
                    None => egui::Rect::from_center_size(screen.center(), egui::vec2(480.0, 320.0)),
                };

                ui.painter()
                    .rect_filled(sheet.expand(8.0), 8.0, egui::Color32::WHITE);
                match &texture {
                    Some(texture) => {
                        ui.painter()
                            .image(texture.id(), sheet, FULL_UV, egui::Color32::WHITE);
                    }
                    None => {
                        let notice = match self.image_error(ImageSlot::Assignment) {
                            Some(reason) => format!("assignment unavailable: {reason}"),
                            None => "loading assignment...".to_string(),
                        };
                        ui.painter().text(
                            sheet.center(),
                            egui::Align2::CENTER_CENTER,
                            notice,
                            egui::FontId::proportional(14.0),
                            egui::Color32::DARK_GRAY,
                        );
                    }
                }

                round_widget_corners(ui, 14);
                let close_rect = egui::Rect::from_center_size(
                    sheet.right_top() + egui::vec2(-10.0, 10.0),
                    egui::vec2(28.0, 28.0),
                );
                if ui.put(close_rect, egui::Button::new("✕")).clicked() {
                    self.apply(SceneEvent::AssignmentClosed);
                }
            });
    }

    fn show_settings_window(&mut self, ctx: &egui::Context) {
        if !self.settings_open {
            return;
        }

        let window_frame = egui::Frame::NONE
            .fill(ctx.style().visuals.window_fill)
            .stroke(egui::Stroke::new(
                1.0,
                ctx.style().visuals.window_stroke().color,
            ))
            .corner_radius(egui::CornerRadius::same(10))
            .inner_margin(egui::Margin::symmetric(12, 10));

        let mut settings_open = self.settings_open;
        let mut close_requested = false;

        egui::Window::new("scene_settings")
            .title_bar(false)
            .frame(window_frame)
            .open(&mut settings_open)
            .resizable(false)
            .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(16.0, -56.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Display").strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✕").clicked() {
                            close_requested = true;
                        }
                    });
                });
                ui.separator();
                ui.add(
                    egui::Slider::new(&mut self.settings.text_scale, 0.8..=1.4)
                        .text("Text scale")
                        .step_by(0.05),
                );
                ui.checkbox(
                    &mut self.settings.show_hotspot_hints,
                    "Show hover hints on scene hotspots",
                );
                if ui.button("Reset to defaults").clicked() {
                    self.settings = SceneSettings::default();
                }
            });

        self.settings_open = settings_open && !close_requested;
    }

    fn show_status_overlay(&mut self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("scene_status"))
            .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(16.0, -16.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.small_button("⚙").clicked() {
                        self.settings_open = !self.settings_open;
                    }
                    if !self.status.is_empty() {
                        ui.small(egui::RichText::new(self.status.as_str()).weak());
                    }
                });
            });
    }
}

impl eframe::App for SceneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.request_missing_images();
        self.apply_text_scale_if_needed(ctx);

        if self.state.dialog != DialogState::OtherInput {
            self.other_input_autofocused = false;
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.paint_background(ui);
                self.paint_librarian(ui);
            });

        self.show_hotspots(ctx);
        self.show_dialog(ctx);
        self.show_assignment_modal(ctx);
        self.show_settings_window(ctx);
        self.show_status_overlay(ctx);

        // Keep frames coming while a deferred message or decode is in flight;
        // otherwise egui only repaints on interaction.
        if self.state.has_pending_message() || self.any_image_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(serialized) = serde_json::to_string(&self.settings.clamped()) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}

fn scaled_text_styles(scale: f32) -> BTreeMap<egui::TextStyle, egui::FontId> {
    use egui::{FontFamily, FontId, TextStyle};

    let scale = scale.clamp(0.8, 1.4);
    [
        (
            TextStyle::Small,
            FontId::new(10.0 * scale, FontFamily::Proportional),
        ),
        (
            TextStyle::Body,
            FontId::new(14.0 * scale, FontFamily::Proportional),
        ),
        (
            TextStyle::Button,
            FontId::new(14.0 * scale, FontFamily::Proportional),
        ),
        (
            TextStyle::Heading,
            FontId::new(20.0 * scale, FontFamily::Proportional),
        ),
        (
            TextStyle::Monospace,
            FontId::new(13.0 * scale, FontFamily::Monospace),
        ),
    ]
    .into()
}

fn round_widget_corners(ui: &mut egui::Ui, radius: u8) {
    let radius = egui::CornerRadius::same(radius);
    let widgets = &mut ui.style_mut().visuals.widgets;
    widgets.inactive.corner_radius = radius;
    widgets.hovered.corner_radius = radius;
    widgets.active.corner_radius = radius;
    widgets.open.corner_radius = radius;
    widgets.noninteractive.corner_radius = radius;
}

/// UV rect that fills `target_aspect` with the image, cropping the longer
/// axis, the way `background-size: cover` behaves.
fn cover_uv(image_size: egui::Vec2, target_aspect: f32) -> egui::Rect {
    let image_aspect = image_size.x / image_size.y;
    if image_aspect > target_aspect {
        let visible = target_aspect / image_aspect;
        let margin = (1.0 - visible) * 0.5;
        egui::Rect::from_min_max(egui::pos2(margin, 0.0), egui::pos2(1.0 - margin, 1.0))
    } else {
        let visible = image_aspect / target_aspect;
        let margin = (1.0 - visible) * 0.5;
        egui::Rect::from_min_max(egui::pos2(0.0, margin), egui::pos2(1.0, 1.0 - margin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_through_json() {
        let settings = SceneSettings {
            text_scale: 1.2,
            show_hotspot_hints: false,
        };
        let text = serde_json::to_string(&settings).expect("serialize");
        let back: SceneSettings = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, settings);
    }

    #[test]
    fn persisted_text_scale_is_clamped_into_range() {
        let clamped = SceneSettings {
            text_scale: 9.0,
            show_hotspot_hints: true,
        }
        .clamped();
        assert_eq!(clamped.text_scale, 1.4);

        let clamped = SceneSettings {
            text_scale: 0.1,
            show_hotspot_hints: true,
        }
        .clamped();
        assert_eq!(clamped.text_scale, 0.8);
    }

    #[test]
    fn scene_paths_resolve_under_the_asset_dir() {
        let startup = StartupConfig {
            asset_dir: PathBuf::from("art"),
        };
        let paths = ScenePaths::from_startup(&startup);
        assert_eq!(paths.background, Path::new("art/reading_room.jpg"));
        assert_eq!(paths.librarian, Path::new("art/librarian.png"));
        assert_eq!(
            paths.for_slot(ImageSlot::Assignment),
            Path::new("art/assignment.jpg")
        );
    }

    #[test]
    fn cover_uv_crops_the_wider_axis() {
        let uv = cover_uv(egui::vec2(200.0, 100.0), 1.0);
        assert!(uv.min.x > 0.0 && uv.max.x < 1.0);
        assert_eq!(uv.min.y, 0.0);
        assert_eq!(uv.max.y, 1.0);

        let uv = cover_uv(egui::vec2(100.0, 200.0), 1.0);
        assert_eq!(uv.min.x, 0.0);
        assert!(uv.min.y > 0.0 && uv.max.y < 1.0);
    }

    #[test]
    fn cover_uv_is_identity_when_aspects_match() {
        let uv = cover_uv(egui::vec2(160.0, 90.0), 160.0 / 90.0);
        assert_eq!(uv, FULL_UV);
    }
}
