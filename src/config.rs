/// User settings, stored as `settings.toml` in the platform config directory.
///
/// Every field is optional in the file so a partial or outdated file still
/// loads. Accessors fall back to the defaults below.

use crate::error::{Error, Result};
use crate::state::compositor::ZoomFactors;
use crate::state::data::Size;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "image-glue";

pub const DEFAULT_MAX_DISPLAY_WIDTH: f32 = 800.0;
pub const DEFAULT_MAX_DISPLAY_HEIGHT: f32 = 600.0;
pub const DEFAULT_EXPORT_FILE_NAME: &str = "combined_image.png";
pub const DEFAULT_NOTICE_SECONDS: u64 = 3;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub max_display_width: Option<f32>,
    #[serde(default)]
    pub max_display_height: Option<f32>,
    #[serde(default)]
    pub zoom_in_factor: Option<f32>,
    #[serde(default)]
    pub zoom_out_factor: Option<f32>,
    #[serde(default)]
    pub export_file_name: Option<String>,
    #[serde(default)]
    pub export_directory: Option<PathBuf>,
    #[serde(default)]
    pub notice_seconds: Option<u64>,
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Settings {
    /// On-screen cap for the canvas; the drawing buffer is never capped
    pub fn display_cap(&self) -> Size {
        Size::new(
            positive_or(self.max_display_width, DEFAULT_MAX_DISPLAY_WIDTH),
            positive_or(self.max_display_height, DEFAULT_MAX_DISPLAY_HEIGHT),
        )
    }

    pub fn zoom(&self) -> ZoomFactors {
        let defaults = ZoomFactors::default();
        ZoomFactors {
            zoom_in: positive_or(self.zoom_in_factor, defaults.zoom_in),
            zoom_out: positive_or(self.zoom_out_factor, defaults.zoom_out),
        }
    }

    pub fn export_file_name(&self) -> &str {
        self.export_file_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_EXPORT_FILE_NAME)
    }

    /// Where the save dialog opens: the configured folder, else Downloads
    pub fn export_directory(&self) -> Option<PathBuf> {
        self.export_directory
            .clone()
            .or_else(dirs::download_dir)
            .or_else(dirs::home_dir)
    }

    pub fn notice_seconds(&self) -> u64 {
        self.notice_seconds.unwrap_or(DEFAULT_NOTICE_SECONDS)
    }

    pub fn log_level(&self) -> tracing::Level {
        self.log_level
            .as_deref()
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .parse()
            .unwrap_or(tracing::Level::INFO)
    }
}

fn positive_or(value: Option<f32>, default: f32) -> f32 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(default)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Settings> {
    if let Some(path) = default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Settings::default())
}

pub fn save(settings: &Settings) -> Result<()> {
    if let Some(path) = default_config_path() {
        return save_to_path(settings, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

pub fn save_to_path(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let content = toml::to_string_pretty(settings)?;
    fs::write(path, content).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
