//! Resource management for scene objects
//!
//! - [`registry`] tracks every geometry and material allocation
//! - [`material`] defines per-mesh PBR materials

pub mod material;
pub mod registry;

pub use material::Material;
pub use registry::{ResourceHandle, ResourceId, ResourceKind, ResourceMetrics, ResourceRegistry};
