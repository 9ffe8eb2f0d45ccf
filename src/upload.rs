/// Image upload: native pickers, directory scanning and background decoding
///
/// Decoding is CPU-bound, so it runs on tokio's blocking pool and the UI
/// only sees the finished batch.

use rfd::FileDialog;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::state::data::DecodedImage;

/// Extensions offered in the file picker
const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "ico", "tga", "pnm", "qoi",
];

/// Where an upload batch came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Files,
    Directory,
}

/// Result of decoding one upload batch
#[derive(Debug, Clone, Default)]
pub struct UploadResult {
    pub images: Vec<DecodedImage>,
    /// Human-readable reasons for files the decoder rejected
    pub failures: Vec<String>,
}

/// Show the native multi-file picker
pub fn pick_files() -> Option<Vec<PathBuf>> {
    FileDialog::new()
        .set_title("Select images")
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_files()
}

/// Show the native folder picker
pub fn pick_folder() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Select a folder with images")
        .pick_folder()
}

/// True if the decoder knows how to read this file's extension
pub fn is_supported_image(path: &Path) -> bool {
    image::ImageFormat::from_path(path)
        .map(|format| format.reading_enabled())
        .unwrap_or(false)
}

/// Recursively collect every decodable image below `folder`, sorted by path
pub fn scan_directory(folder: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(folder)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_supported_image(path))
        .collect();

    paths.sort();
    paths
}

/// Decode a single file into RGBA pixels
pub fn decode_file(path: &Path) -> Result<DecodedImage> {
    let decoded = image::open(path).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    Ok(DecodedImage {
        name,
        path: path.to_path_buf(),
        pixels: Arc::new(decoded.to_rgba8()),
    })
}

fn decode_batch(paths: &[PathBuf]) -> UploadResult {
    let mut result = UploadResult::default();

    for path in paths {
        match decode_file(path) {
            Ok(image) => {
                tracing::debug!(
                    path = %path.display(),
                    width = image.pixels.width(),
                    height = image.pixels.height(),
                    "decoded image"
                );
                result.images.push(image);
            }
            Err(e) => {
                tracing::warn!("skipping upload: {}", e);
                result.failures.push(e.to_string());
            }
        }
    }

    result
}

/// Decode a batch of files off the UI thread
pub async fn decode_files(paths: Vec<PathBuf>) -> UploadResult {
    match task::spawn_blocking(move || decode_batch(&paths)).await {
        Ok(result) => result,
        Err(e) => UploadResult {
            images: Vec::new(),
            failures: vec![Error::Join(e).to_string()],
        },
    }
}

/// Scan a folder and decode everything in it off the UI thread
pub async fn decode_directory(folder: PathBuf) -> UploadResult {
    tracing::info!(folder = %folder.display(), "scanning folder");

    let scanned = task::spawn_blocking(move || {
        let paths = scan_directory(&folder);
        tracing::info!(count = paths.len(), "found images in folder");
        decode_batch(&paths)
    })
    .await;

    scanned.unwrap_or_else(|e| UploadResult {
        images: Vec::new(),
        failures: vec![Error::Join(e).to_string()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::fs;
    use tempfile::tempdir;

    fn write_png(path: &Path, width: u32, height: u32) {
        RgbaImage::from_pixel(width, height, Rgba([0, 128, 255, 255]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_image(Path::new("a.png")));
        assert!(is_supported_image(Path::new("b.JPG")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }

    #[test]
    fn test_scan_directory_is_recursive_and_filtered() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();

        write_png(&dir.path().join("b.png"), 2, 2);
        write_png(&nested.join("a.png"), 2, 2);
        fs::write(dir.path().join("readme.txt"), "hello").unwrap();

        let found = scan_directory(dir.path());
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|path| path.extension().unwrap() == "png"));
    }

    #[test]
    fn test_decode_file_reads_natural_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.png");
        write_png(&path, 7, 3);

        let image = decode_file(&path).unwrap();
        assert_eq!(image.name, "wide.png");
        assert_eq!((image.pixels.width(), image.pixels.height()), (7, 3));
    }

    #[tokio::test]
    async fn test_decode_files_skips_broken_files() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.png");
        let broken = dir.path().join("broken.png");
        write_png(&good, 4, 4);
        fs::write(&broken, b"definitely not a png").unwrap();

        let result = decode_files(vec![good, broken]).await;
        assert_eq!(result.images.len(), 1);
        assert_eq!(result.failures.len(), 1);
        assert!(result.failures[0].contains("broken.png"));
    }

    #[tokio::test]
    async fn test_decode_directory() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("one.png"), 1, 1);
        write_png(&dir.path().join("two.png"), 2, 2);

        let result = decode_directory(dir.path().to_path_buf()).await;
        let names: Vec<_> = result.images.iter().map(|image| image.name.as_str()).collect();
        assert_eq!(names, ["one.png", "two.png"]);
        assert!(result.failures.is_empty());
    }
}
