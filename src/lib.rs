// src/lib.rs
//! Exhibit
//!
//! Model loading, caching and scene lifecycle for a paged 3D exhibit gallery.
//! A [`gallery::GalleryController`] pages through a fixed dataset, resolves
//! each item through an [`assets::AssetCache`], and keeps exactly one
//! placed, disposable object attached to the scene.

pub mod app;
pub mod assets;
pub mod config;
pub mod error;
pub mod gallery;
pub mod gfx;
pub mod prelude;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main types for convenience
pub use app::ExhibitApp;
pub use config::ExhibitConfig;

/// Loads a configuration file and builds an app from it
pub fn from_config_file(path: impl AsRef<std::path::Path>) -> Result<ExhibitApp, error::ConfigError> {
    let config = ExhibitConfig::load(path.as_ref())?;
    ExhibitApp::new(&config)
}
