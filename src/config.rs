//! Gallery configuration files
//!
//! ```json
//! {
//!   "asset_root": "assets",
//!   "vertical_offset": 1.1,
//!   "modes": [
//!     { "name": "solo", "items": [
//!       { "locator": "LAMP.glb", "author": { "key": "author.lamp" },
//!         "link": "https://example.com", "description": "Desk lamp" }
//!     ] }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gallery::{GalleryDataset, GalleryMode, DEFAULT_VERTICAL_OFFSET};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExhibitConfig {
    /// Directory locators are resolved against
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
    /// Height of the displayed model's center above the origin
    #[serde(default = "default_vertical_offset")]
    pub vertical_offset: f32,
    pub modes: Vec<GalleryMode>,
}

fn default_asset_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_vertical_offset() -> f32 {
    DEFAULT_VERTICAL_OFFSET
}

impl ExhibitConfig {
    /// Read and parse a configuration file.
    ///
    /// A relative `asset_root` is taken relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut config = Self::from_json(&text)?;
        if config.asset_root.is_relative() {
            if let Some(dir) = path.parent() {
                config.asset_root = dir.join(&config.asset_root);
            }
        }

        log::info!(
            "Loaded gallery configuration from {} ({} modes)",
            path.display(),
            config.modes.len()
        );
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validate the modes into a dataset
    pub fn dataset(&self) -> Result<GalleryDataset, ConfigError> {
        GalleryDataset::new(self.modes.clone())
    }
}
