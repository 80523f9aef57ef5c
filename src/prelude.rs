//! # Exhibit Prelude
//!
//! Commonly used types in one import:
//!
//! ```rust
//! use exhibit::prelude::*;
//!
//! let dataset = GalleryDataset::builder()
//!     .mode("solo", vec![GalleryItem::new("LAMP.glb")])
//!     .build()
//!     .unwrap();
//! assert_eq!(dataset.mode_names(), vec!["solo"]);
//! ```

// Re-export core application types
pub use crate::app::{Command, ExhibitApp};
pub use crate::config::ExhibitConfig;

// Re-export asset types
pub use crate::assets::{AssetCache, AssetDecoder, CacheStats, FileDecoder};

// Re-export gallery types
pub use crate::gallery::{
    CycleOutcome, GalleryController, GalleryDataset, GalleryItem, Navigation, NavigationState,
    Position, TextRef,
};

// Re-export scene types
pub use crate::gfx::{
    resources::{Material, ResourceRegistry},
    scene::{Renderer, Scene, SceneObject, SharedObject},
    Aabb,
};

// Re-export error types
pub use crate::error::{ConfigError, DecodeError, GalleryError};

// Re-export common external dependencies
pub use cgmath::Vector3;
