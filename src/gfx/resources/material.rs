//! Material definitions for decoded models
//!
//! Each mesh of a scene object owns its material. Materials carry PBR
//! parameters and a tracked resource handle standing in for their uniform data.

use std::sync::Arc;

use super::registry::{ResourceHandle, ResourceId, ResourceKind, ResourceRegistry};

/// Size of the uniform block a material occupies once uploaded
pub const MATERIAL_UNIFORM_BYTES: u64 = 48;

/// Material definition with PBR properties
#[derive(Debug)]
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,

    resource: Option<ResourceHandle>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 0.5,
            resource: None,
        }
    }
}

impl Material {
    /// Creates a new untracked material with basic PBR properties
    ///
    /// # Arguments
    /// * `name` - Name for this material
    /// * `base_color` - RGBA base color
    /// * `metallic` - Metallic factor (0.0 = dielectric, 1.0 = metallic)
    /// * `roughness` - Surface roughness (0.0 = mirror, 1.0 = rough)
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            resource: None,
        }
    }

    /// Builder pattern: Register the material's uniform data with a registry
    pub fn tracked(mut self, registry: &Arc<ResourceRegistry>) -> Self {
        if let Some(old) = self.resource.take() {
            old.release();
        }
        self.resource = Some(registry.allocate(ResourceKind::Material, MATERIAL_UNIFORM_BYTES));
        self
    }

    /// Id of the tracked resource, `None` once disposed or if never tracked
    pub fn resource_id(&self) -> Option<ResourceId> {
        self.resource.as_ref().map(ResourceHandle::id)
    }

    pub fn is_disposed(&self) -> bool {
        self.resource.is_none()
    }

    /// Independent copy with its own tracked resource
    pub fn deep_clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            base_color: self.base_color,
            metallic: self.metallic,
            roughness: self.roughness,
            resource: self.resource.as_ref().map(ResourceHandle::duplicate),
        }
    }

    /// Release the tracked resource. Calling this again is a no-op.
    pub fn dispose(&mut self) {
        if let Some(resource) = self.resource.take() {
            resource.release();
        }
    }
}

/// Convert an MTL shininess exponent to a roughness value
pub fn roughness_from_shininess(shininess: f32) -> f32 {
    1.0 - (shininess / 128.0).clamp(0.0, 1.0)
}
