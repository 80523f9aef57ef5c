//! # Graphics Module
//!
//! Scene-side data for the gallery: decoded objects, their tracked resources,
//! and the scene graph they are displayed in.
//!
//! - **Scene Management** ([`scene`]) - Objects, meshes and the scene anchor
//! - **Resource Management** ([`resources`]) - Materials and allocation tracking
//! - **Bounds** ([`bounds`]) - Axis-aligned boxes used for placement

pub mod bounds;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use bounds::Aabb;
pub use scene::{Renderer, Scene, SceneObject, SharedObject};
