/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the upload layer, the compositor and the UI layer.

use iced::widget::image::Handle;
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::Arc;

use super::compositor::Transform;

/// Identifier handed out by the library, unique for the whole session
pub type ImageId = u64;

/// Natural (decoded) size of an image in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An image decoded from disk, ready to be listed and drawn
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Filename only (e.g., "IMG_0001.png")
    pub name: String,
    /// Full path of the source file
    pub path: PathBuf,
    /// Decoded RGBA pixels, used for export
    pub pixels: Arc<RgbaImage>,
}

/// Represents a single image in the library
#[derive(Debug, Clone)]
pub struct ImageRecord {
    /// Unique session ID
    pub id: ImageId,
    /// Name shown in the sidebar list
    pub name: String,
    /// The file this image came from
    pub path: PathBuf,
    /// Decoded pixels, shared with export jobs
    pub pixels: Arc<RgbaImage>,
    /// Handle used by both the list thumbnail and the canvas
    pub handle: Handle,
}

impl ImageRecord {
    pub fn new(id: ImageId, decoded: DecodedImage) -> Self {
        let handle = Handle::from_rgba(
            decoded.pixels.width(),
            decoded.pixels.height(),
            decoded.pixels.as_raw().clone(),
        );

        Self {
            id,
            name: decoded.name,
            path: decoded.path,
            pixels: decoded.pixels,
            handle,
        }
    }

    /// Natural size of the image
    pub fn size(&self) -> Size {
        Size::new(self.pixels.width() as f32, self.pixels.height() as f32)
    }
}

/// One selected image as it is placed on the canvas
#[derive(Debug, Clone)]
pub struct Layer {
    pub handle: Handle,
    pub pixels: Arc<RgbaImage>,
    pub transform: Transform,
}

impl Layer {
    pub fn natural_size(&self) -> Size {
        Size::new(self.pixels.width() as f32, self.pixels.height() as f32)
    }
}

/// Everything needed to draw or export the current composition.
/// Only exists while exactly two images are selected.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Layers in z-order: slot 0 is drawn first
    pub layers: [Layer; 2],
    /// Drawing-buffer size
    pub size: Size,
}

#[cfg(test)]
pub(crate) fn test_image(name: &str, width: u32, height: u32) -> DecodedImage {
    DecodedImage {
        name: name.to_string(),
        path: PathBuf::from(format!("/tmp/{}", name)),
        pixels: Arc::new(RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]))),
    }
}
