use iced::alignment::{Horizontal, Vertical};
use iced::widget::{button, canvas, column, container, horizontal_rule, row, stack, text};
use iced::{Element, Length, Point, Task, Theme};
use std::path::PathBuf;
use std::time::Duration;

mod config;
mod error;
mod export;
mod state;
mod ui;
mod upload;

use config::Settings;
use export::ExportError;
use state::compositor::{Compositor, WheelDirection};
use state::data::{ImageId, Layer, Scene};
use state::library::Library;
use state::selection::{Selection, Toggle, MAX_SELECTION};
use ui::notice::{Level, Notices};
use upload::UploadResult;

/// Main application state
struct ImageGlue {
    settings: Settings,
    /// Every image uploaded this session
    library: Library,
    /// The (at most two) images being combined
    selection: Selection,
    /// Transforms and drag state for the selected pair
    compositor: Compositor,
    notices: Notices,
    /// Upload batches still decoding
    pending_uploads: usize,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User picked "Upload files"
    UploadFiles,
    /// User picked "Upload folder"
    UploadDirectory,
    /// Background decoding finished
    UploadComplete(upload::Source, UploadResult),
    /// Checkbox in the image list toggled
    ToggleSelection(ImageId),
    /// Canvas events, already in drawing-buffer coordinates
    PointerDown(Point),
    PointerMoved(Point),
    PointerUp,
    Wheel(Point, WheelDirection),
    /// User picked "Save"
    Save,
    SaveComplete(Result<PathBuf, ExportError>),
    DismissNotice(u64),
}

impl ImageGlue {
    fn new(settings: Settings) -> (Self, Task<Message>) {
        tracing::info!(cap = ?settings.display_cap(), zoom = ?settings.zoom(), "image glue started");

        let compositor = Compositor::new(settings.zoom());
        (
            ImageGlue {
                settings,
                library: Library::new(),
                selection: Selection::new(),
                compositor,
                notices: Notices::default(),
                pending_uploads: 0,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::UploadFiles => {
                let Some(paths) = upload::pick_files() else {
                    return Task::none();
                };

                self.pending_uploads += 1;
                Task::perform(upload::decode_files(paths), |result| {
                    Message::UploadComplete(upload::Source::Files, result)
                })
            }
            Message::UploadDirectory => {
                let Some(folder) = upload::pick_folder() else {
                    return Task::none();
                };

                self.pending_uploads += 1;
                Task::perform(upload::decode_directory(folder), |result| {
                    Message::UploadComplete(upload::Source::Directory, result)
                })
            }
            Message::UploadComplete(source, result) => {
                self.pending_uploads = self.pending_uploads.saturating_sub(1);

                let skipped = result.failures.len();
                let added = self.library.add(result.images);
                tracing::info!(?source, added, skipped, "upload complete");

                let mut tasks = Vec::new();
                if added > 0 {
                    tasks.push(self.notify(
                        Level::Success,
                        format!("{} files added successfully", added),
                    ));
                } else if skipped == 0 {
                    tasks.push(self.notify(Level::Warning, "No images found to add"));
                }
                if skipped > 0 {
                    tasks.push(self.notify(
                        Level::Warning,
                        format!("{} files could not be decoded and were skipped", skipped),
                    ));
                }
                Task::batch(tasks)
            }
            Message::ToggleSelection(id) => match self.selection.toggle(id) {
                Toggle::Full => self.notify(
                    Level::Warning,
                    format!("You can select at most {} images", MAX_SELECTION),
                ),
                outcome => {
                    tracing::debug!(id, ?outcome, selected = ?self.selection.ids(), "selection changed");
                    self.sync_pair();
                    Task::none()
                }
            },
            Message::PointerDown(point) => {
                if let Some(slot) = self.compositor.pointer_down(point) {
                    tracing::trace!(slot, "drag started");
                }
                Task::none()
            }
            Message::PointerMoved(point) => {
                self.compositor.pointer_move(point);
                Task::none()
            }
            Message::PointerUp => {
                self.compositor.pointer_up();
                Task::none()
            }
            Message::Wheel(point, direction) => {
                if let Some(slot) = self.compositor.wheel(point, direction) {
                    tracing::trace!(slot, ?direction, "zoomed");
                }
                Task::none()
            }
            Message::Save => {
                let scene = match export::prepare(self.selection.len(), self.scene().as_ref()) {
                    Ok(scene) => scene,
                    Err(e) => {
                        tracing::warn!("save rejected: {}", e);
                        return self.notify(Level::Error, e.to_string());
                    }
                };

                let Some(path) = export::pick_destination(
                    self.settings.export_directory(),
                    self.settings.export_file_name(),
                ) else {
                    tracing::debug!("save dialog cancelled");
                    return Task::none();
                };

                Task::perform(export::export_png(scene, path), Message::SaveComplete)
            }
            Message::SaveComplete(Ok(path)) => {
                self.remember_export_directory(&path);
                self.notify(Level::Success, "Combined image saved successfully")
            }
            Message::SaveComplete(Err(e)) => {
                tracing::error!("export failed: {}", e);
                self.notify(Level::Error, e.to_string())
            }
            Message::DismissNotice(id) => {
                self.notices.dismiss(id);
                Task::none()
            }
        }
    }

    /// Show a notice and schedule its dismissal
    fn notify(&mut self, level: Level, text: impl Into<String>) -> Task<Message> {
        let id = self.notices.push(level, text);
        let delay = Duration::from_secs(self.settings.notice_seconds());

        Task::perform(async move { tokio::time::sleep(delay).await }, move |_| {
            Message::DismissNotice(id)
        })
    }

    /// Keep the compositor in step with the selection
    fn sync_pair(&mut self) {
        let sizes = self.selection.pair().and_then(|(left, right)| {
            Some([self.library.get(left)?.size(), self.library.get(right)?.size()])
        });

        match sizes {
            Some(sizes) => self.compositor.set_pair(sizes),
            None => self.compositor.clear_pair(),
        }
    }

    /// The composition to draw; only exists while two images are selected
    fn scene(&self) -> Option<Scene> {
        let (left, right) = self.selection.pair()?;
        let size = self.compositor.canvas_size()?;
        let [left_transform, right_transform] = *self.compositor.transforms();

        let layer = |id: ImageId, transform| {
            self.library.get(id).map(|record| Layer {
                handle: record.handle.clone(),
                pixels: record.pixels.clone(),
                transform,
            })
        };

        Some(Scene {
            layers: [layer(left, left_transform)?, layer(right, right_transform)?],
            size,
        })
    }

    fn remember_export_directory(&mut self, path: &std::path::Path) {
        let Some(directory) = path.parent().map(|parent| parent.to_path_buf()) else {
            return;
        };
        if self.settings.export_directory.as_ref() == Some(&directory) {
            return;
        }

        self.settings.export_directory = Some(directory);
        if let Err(e) = config::save(&self.settings) {
            tracing::warn!("could not save settings: {}", e);
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let can_save = self.selection.len() == MAX_SELECTION;

        let menu = row![
            button("Upload files").on_press(Message::UploadFiles).padding(8),
            button("Upload folder").on_press(Message::UploadDirectory).padding(8),
            button("Save")
                .on_press_maybe(can_save.then_some(Message::Save))
                .padding(8),
            text(if self.pending_uploads > 0 { "Loading images..." } else { "" }).size(14),
        ]
        .spacing(10)
        .padding(10)
        .align_y(Vertical::Center);

        let sidebar = container(ui::sidebar::view(&self.library, &self.selection))
            .width(Length::FillPortion(1))
            .height(Length::Fill);

        let body = row![sidebar, self.canvas_view()].height(Length::Fill);

        let notices = container(self.notices.view())
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(20)
            .align_x(Horizontal::Right)
            .align_y(Vertical::Bottom);

        stack![column![menu, horizontal_rule(1), body], notices].into()
    }

    fn canvas_view(&self) -> Element<'_, Message> {
        let cap = self.settings.display_cap();

        let content: Element<'_, Message> = match (self.scene(), self.compositor.display_size(cap)) {
            (Some(scene), Some(display)) => {
                let program = ui::canvas::CompositorCanvas {
                    scene,
                    compositor: &self.compositor,
                    display_scale: self.compositor.display_scale(cap),
                };
                canvas(program)
                    .width(Length::Fixed(display.width))
                    .height(Length::Fixed(display.height))
                    .into()
            }
            _ => text(ui::sidebar::HINT).size(16).into(),
        };

        container(content)
            .width(Length::FillPortion(3))
            .height(Length::Fill)
            .padding([20, 50])
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn main() -> iced::Result {
    let (settings, config_error) = match config::load() {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    tracing_subscriber::fmt()
        .with_max_level(settings.log_level())
        .with_target(false)
        .init();

    if let Some(e) = config_error {
        tracing::warn!("using default settings: {}", e);
    }

    iced::application("Image Glue", ImageGlue::update, ImageGlue::view)
        .theme(ImageGlue::theme)
        .centered()
        .run_with(move || ImageGlue::new(settings))
}
