/// PNG export of the current composition
///
/// The export renders at full drawing-buffer resolution, independent of the
/// on-screen display cap. Layers are painted in slot order and clipped to the
/// buffer, exactly like the canvas preview.

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use rfd::FileDialog;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::task;

use crate::state::data::{Layer, Scene};
use crate::state::selection::MAX_SELECTION;

/// Largest canvas buffer we are willing to allocate
const MAX_BUFFER_BYTES: u64 = 1 << 31;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExportError {
    #[error("Please select exactly 2 images to combine")]
    WrongSelection(usize),

    #[error("Canvas not found")]
    CanvasMissing,

    #[error("Unable to create drawing surface ({width}x{height})")]
    SurfaceUnavailable { width: f32, height: f32 },

    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Export task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Check the save preconditions and hand back the scene to render
pub fn prepare(selected: usize, scene: Option<&Scene>) -> Result<Scene> {
    if selected != MAX_SELECTION {
        return Err(ExportError::WrongSelection(selected));
    }
    scene.cloned().ok_or(ExportError::CanvasMissing)
}

/// Pixel dimensions for a float size, or `None` if it cannot be allocated
fn buffer_dimensions(width: f32, height: f32) -> Option<(u32, u32)> {
    if !width.is_finite() || !height.is_finite() {
        return None;
    }

    let (w, h) = (width.round(), height.round());
    if w < 1.0 || h < 1.0 || w > u32::MAX as f32 || h > u32::MAX as f32 {
        return None;
    }

    let (w, h) = (w as u32, h as u32);
    let bytes = (w as u64).checked_mul(h as u64)?.checked_mul(4)?;
    (bytes <= MAX_BUFFER_BYTES).then_some((w, h))
}

/// Visible part of a layer in canvas pixels, as `[start, end)` per axis
fn visible_span(offset: f32, extent: f32, limit: u32) -> Option<(u32, u32)> {
    if !offset.is_finite() || !extent.is_finite() {
        return None;
    }

    let start = offset.round().max(0.0);
    let end = (offset + extent).round().min(limit as f32);
    (end - start >= 1.0).then_some((start as u32, end as u32))
}

/// Source pixels `[start, end)` that land on canvas pixels `[from, to)`
fn source_span(from: u32, to: u32, offset: f32, scale: f32, natural: u32) -> (u32, u32) {
    let start = (((from as f32 - offset) / scale).floor().max(0.0) as u32).min(natural - 1);
    let end = (((to as f32 - offset) / scale).ceil() as u32).clamp(start + 1, natural);
    (start, end)
}

/// Paint one layer, resampling only the part that falls inside the canvas.
/// Layers smaller than a pixel or entirely off-canvas draw nothing.
fn paint_layer(canvas: &mut RgbaImage, layer: &Layer) {
    let transform = layer.transform;
    let (natural_w, natural_h) = layer.pixels.dimensions();
    if natural_w == 0 || natural_h == 0 {
        return;
    }

    if transform.scale == 1.0 {
        // overlay clips on its own
        let (x, y) = (transform.x.round() as i64, transform.y.round() as i64);
        imageops::overlay(canvas, &*layer.pixels, x, y);
        return;
    }

    let scaled = transform.scaled(layer.natural_size());
    let (Some((x0, x1)), Some((y0, y1))) = (
        visible_span(transform.x, scaled.width, canvas.width()),
        visible_span(transform.y, scaled.height, canvas.height()),
    ) else {
        return;
    };

    let (src_x0, src_x1) = source_span(x0, x1, transform.x, transform.scale, natural_w);
    let (src_y0, src_y1) = source_span(y0, y1, transform.y, transform.scale, natural_h);

    let visible = imageops::crop_imm(
        &*layer.pixels,
        src_x0,
        src_y0,
        src_x1 - src_x0,
        src_y1 - src_y0,
    )
    .to_image();
    let resized = imageops::resize(&visible, x1 - x0, y1 - y0, FilterType::Triangle);
    imageops::overlay(canvas, &resized, x0 as i64, y0 as i64);
}

/// Render the scene into a transparent buffer of canvas size
pub fn render(scene: &Scene) -> Result<RgbaImage> {
    let (width, height) = buffer_dimensions(scene.size.width, scene.size.height).ok_or(
        ExportError::SurfaceUnavailable {
            width: scene.size.width,
            height: scene.size.height,
        },
    )?;

    let mut canvas = RgbaImage::new(width, height);
    for layer in &scene.layers {
        paint_layer(&mut canvas, layer);
    }

    Ok(canvas)
}

/// Show the native save dialog with the default file name filled in
pub fn pick_destination(directory: Option<PathBuf>, file_name: &str) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Save combined image")
        .add_filter("PNG image", &["png"])
        .set_file_name(file_name);

    if let Some(directory) = directory {
        dialog = dialog.set_directory(directory);
    }

    dialog.save_file()
}

pub fn write_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| ExportError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Render and encode off the UI thread. Returns the written path.
pub async fn export_png(scene: Scene, path: PathBuf) -> Result<PathBuf> {
    task::spawn_blocking(move || {
        let image = render(&scene)?;
        write_png(&image, &path)?;
        tracing::info!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "exported combined image"
        );
        Ok(path)
    })
    .await
    .map_err(|e| ExportError::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::compositor::Transform;
    use crate::state::data::Size;
    use iced::widget::image::Handle;
    use image::Rgba;
    use std::sync::Arc;
    use tempfile::tempdir;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn layer(width: u32, height: u32, color: Rgba<u8>, transform: Transform) -> Layer {
        let pixels = RgbaImage::from_pixel(width, height, color);
        Layer {
            handle: Handle::from_rgba(width, height, pixels.as_raw().clone()),
            pixels: Arc::new(pixels),
            transform,
        }
    }

    fn side_by_side() -> Scene {
        Scene {
            layers: [
                layer(4, 2, RED, Transform::default()),
                layer(3, 3, BLUE, Transform::at(4.0, 0.0)),
            ],
            size: Size::new(7.0, 3.0),
        }
    }

    #[test]
    fn test_prepare_requires_two_images() {
        let scene = side_by_side();
        assert_eq!(
            prepare(1, Some(&scene)).unwrap_err(),
            ExportError::WrongSelection(1)
        );
        assert_eq!(prepare(0, None).unwrap_err(), ExportError::WrongSelection(0));
        assert_eq!(
            ExportError::WrongSelection(1).to_string(),
            "Please select exactly 2 images to combine"
        );
    }

    #[test]
    fn test_prepare_requires_canvas() {
        assert_eq!(prepare(2, None).unwrap_err(), ExportError::CanvasMissing);
        assert!(prepare(2, Some(&side_by_side())).is_ok());
    }

    #[test]
    fn test_render_places_images_side_by_side() {
        let image = render(&side_by_side()).unwrap();

        assert_eq!(image.dimensions(), (7, 3));
        assert_eq!(*image.get_pixel(0, 0), RED);
        assert_eq!(*image.get_pixel(3, 1), RED);
        assert_eq!(*image.get_pixel(4, 0), BLUE);
        assert_eq!(*image.get_pixel(6, 2), BLUE);
        // below the shorter left image stays transparent
        assert_eq!(*image.get_pixel(0, 2), CLEAR);
    }

    #[test]
    fn test_render_draws_second_slot_on_top() {
        let mut scene = side_by_side();
        scene.layers[1].transform = Transform::at(0.0, 0.0);

        let image = render(&scene).unwrap();
        assert_eq!(*image.get_pixel(0, 0), BLUE);
        assert_eq!(*image.get_pixel(3, 0), RED);
    }

    #[test]
    fn test_render_applies_scale_and_clips() {
        let mut scene = side_by_side();
        scene.layers[0].transform = Transform {
            scale: 0.5,
            x: 0.0,
            y: 0.0,
        };
        // pushed partly outside the buffer
        scene.layers[1].transform = Transform::at(5.0, 1.0);

        let image = render(&scene).unwrap();
        assert_eq!(*image.get_pixel(1, 0), RED);
        assert_eq!(*image.get_pixel(2, 0), CLEAR);
        assert_eq!(*image.get_pixel(6, 2), BLUE);
        assert_eq!(*image.get_pixel(5, 0), CLEAR);
    }

    #[test]
    fn test_render_skips_layer_smaller_than_a_pixel() {
        let mut scene = side_by_side();
        scene.layers[0].transform = Transform {
            scale: 0.1,
            x: 0.0,
            y: 0.0,
        };

        let image = render(&scene).unwrap();
        assert_eq!(image.dimensions(), (7, 3));
        assert_eq!(*image.get_pixel(0, 0), CLEAR);
        assert_eq!(*image.get_pixel(4, 0), BLUE);
    }

    #[test]
    fn test_render_zoomed_layer_mostly_off_canvas() {
        let scene = Scene {
            layers: [
                layer(400, 300, RED, Transform {
                    scale: 100.0,
                    x: -1000.0,
                    y: -1000.0,
                }),
                layer(300, 300, BLUE, Transform::at(400.0, 0.0)),
            ],
            size: Size::new(700.0, 300.0),
        };

        let image = render(&scene).unwrap();
        assert_eq!(image.dimensions(), (700, 300));
        assert_eq!(*image.get_pixel(0, 0), RED);
        assert_eq!(*image.get_pixel(399, 299), RED);
        assert_eq!(*image.get_pixel(400, 0), BLUE);
    }

    #[test]
    fn test_render_skips_layer_outside_canvas() {
        let mut scene = side_by_side();
        scene.layers[0].transform = Transform {
            scale: 2.0,
            x: -50.0,
            y: 0.0,
        };

        let image = render(&scene).unwrap();
        assert_eq!(*image.get_pixel(0, 0), CLEAR);
        assert_eq!(*image.get_pixel(5, 1), BLUE);
    }

    #[test]
    fn test_visible_span_clamps_to_canvas() {
        assert_eq!(visible_span(-1000.0, 40000.0, 700), Some((0, 700)));
        assert_eq!(visible_span(2.0, 3.0, 4), Some((2, 4)));
        assert_eq!(visible_span(0.0, 0.4, 7), None);
        assert_eq!(visible_span(10.0, 5.0, 7), None);
        assert_eq!(source_span(0, 700, -1000.0, 100.0, 400), (10, 17));
    }

    #[test]
    fn test_render_rejects_empty_surface() {
        let mut scene = side_by_side();
        scene.size = Size::new(0.0, 3.0);

        assert!(matches!(
            render(&scene),
            Err(ExportError::SurfaceUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_export_png_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("combined_image.png");

        let written = export_png(side_by_side(), path.clone()).await.unwrap();
        assert_eq!(written, path);

        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (7, 3));
        assert_eq!(*reloaded.get_pixel(4, 0), BLUE);
    }

    #[tokio::test]
    async fn test_export_png_reports_write_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");

        let err = export_png(side_by_side(), path).await.unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
    }
}
