use std::sync::Arc;

use cgmath::{Matrix4, SquareMatrix, Vector3};

use super::vertex::Vertex3D;
use crate::gfx::{
    bounds::Aabb,
    resources::{
        material::Material,
        registry::{ResourceHandle, ResourceId, ResourceKind, ResourceRegistry},
    },
};

/// Indexed triangle data plus the tracked buffer allocation backing it
#[derive(Debug)]
pub struct Geometry {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    resource: Option<ResourceHandle>,
}

impl Geometry {
    /// Create untracked geometry
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            resource: None,
        }
    }

    /// Register the vertex and index buffers with a registry
    pub fn tracked(mut self, registry: &Arc<ResourceRegistry>) -> Self {
        if let Some(old) = self.resource.take() {
            old.release();
        }
        self.resource = Some(registry.allocate(ResourceKind::Geometry, self.byte_size()));
        self
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bytes needed for the vertex and index buffers
    pub fn byte_size(&self) -> u64 {
        (bytemuck::cast_slice::<Vertex3D, u8>(&self.vertices).len()
            + bytemuck::cast_slice::<u32, u8>(&self.indices).len()) as u64
    }

    pub fn resource_id(&self) -> Option<ResourceId> {
        self.resource.as_ref().map(ResourceHandle::id)
    }

    pub fn is_disposed(&self) -> bool {
        self.resource.is_none()
    }

    pub fn deep_clone(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            indices: self.indices.clone(),
            resource: self.resource.as_ref().map(ResourceHandle::duplicate),
        }
    }

    /// Release the buffers. Calling this again is a no-op.
    pub fn dispose(&mut self) {
        if let Some(resource) = self.resource.take() {
            resource.release();
        }
    }

    fn local_bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(|v| Vector3::from(v.position)))
    }
}

/// One renderable part of an object
#[derive(Debug)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self { geometry, material }
    }

    pub fn deep_clone(&self) -> Self {
        Self {
            geometry: self.geometry.deep_clone(),
            material: self.material.deep_clone(),
        }
    }

    pub fn dispose(&mut self) {
        self.geometry.dispose();
        self.material.dispose();
    }
}

/// A node of a decoded model: transform, renderable parts and child nodes.
///
/// `SceneObject` deliberately has no `Clone` impl. Copies go through
/// [`SceneObject::deep_clone`], which gives every part its own resources.
#[derive(Debug)]
pub struct SceneObject {
    pub name: String,
    pub transform: Matrix4<f32>,
    pub meshes: Vec<Mesh>,
    pub children: Vec<SceneObject>,
}

impl SceneObject {
    /// Create an empty node with identity transformation
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Matrix4::identity(),
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder pattern: add a renderable part
    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.meshes.push(mesh);
        self
    }

    /// Builder pattern: add a child node
    pub fn with_child(mut self, child: SceneObject) -> Self {
        self.children.push(child);
        self
    }

    /// Builder pattern: set the local transform
    pub fn with_transform(mut self, transform: Matrix4<f32>) -> Self {
        self.transform = transform;
        self
    }

    /// Apply translation in parent space, independent of rotation and scale
    pub fn translate_world(&mut self, translation: Vector3<f32>) {
        self.transform = Matrix4::from_translation(translation) * self.transform;
    }

    /// Translation part of the local transform
    pub fn position(&self) -> Vector3<f32> {
        self.transform.w.truncate()
    }

    /// Bounds of every vertex below this node, in the node's parent space
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds_with(&Matrix4::identity())
    }

    fn bounds_with(&self, parent: &Matrix4<f32>) -> Option<Aabb> {
        let world = parent * self.transform;

        let own = self
            .meshes
            .iter()
            .filter_map(|mesh| mesh.geometry.local_bounds())
            .map(|aabb| aabb.transformed(&world));
        let nested = self
            .children
            .iter()
            .filter_map(|child| child.bounds_with(&world));

        own.chain(nested).reduce(|a, b| a.union(&b))
    }

    /// Independent copy of the whole node tree with fresh resources
    pub fn deep_clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            transform: self.transform,
            meshes: self.meshes.iter().map(Mesh::deep_clone).collect(),
            children: self.children.iter().map(SceneObject::deep_clone).collect(),
        }
    }

    /// Release every geometry and material below this node.
    ///
    /// Safe to call on objects without resources and to call repeatedly.
    pub fn dispose(&mut self) {
        for mesh in &mut self.meshes {
            mesh.dispose();
        }
        for child in &mut self.children {
            child.dispose();
        }
    }

    /// Visit this node and every descendant, depth first
    pub fn traverse<F: FnMut(&SceneObject)>(&self, visit: &mut F) {
        visit(self);
        for child in &self.children {
            child.traverse(visit);
        }
    }

    /// Ids of every still-live resource below this node
    pub fn resource_ids(&self) -> Vec<ResourceId> {
        let mut ids = Vec::new();
        self.traverse(&mut |node| {
            for mesh in &node.meshes {
                ids.extend(mesh.geometry.resource_id());
                ids.extend(mesh.material.resource_id());
            }
        });
        ids
    }

    /// Whether every resource below this node has been released
    pub fn is_disposed(&self) -> bool {
        self.resource_ids().is_empty()
    }

    pub fn mesh_count(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |node| count += node.meshes.len());
        count
    }

    pub fn triangle_count(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |node| {
            count += node
                .meshes
                .iter()
                .map(|m| m.geometry.triangle_count())
                .sum::<usize>()
        });
        count
    }

    pub fn vertex_count(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |node| {
            count += node
                .meshes
                .iter()
                .map(|m| m.geometry.vertex_count())
                .sum::<usize>()
        });
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::cuboid_mesh;

    fn sample(registry: &Arc<ResourceRegistry>) -> SceneObject {
        SceneObject::new("lamp")
            .with_mesh(cuboid_mesh(registry, [-1.0, 0.0, -1.0], [1.0, 2.0, 1.0]))
            .with_child(
                SceneObject::new("shade")
                    .with_transform(Matrix4::from_translation(Vector3::new(0.0, 3.0, 0.0)))
                    .with_mesh(cuboid_mesh(registry, [-0.5, 0.0, -0.5], [0.5, 1.0, 0.5])),
            )
    }

    #[test]
    fn test_bounds_include_children() {
        let registry = Arc::new(ResourceRegistry::new());
        let object = sample(&registry);

        let bounds = object.bounds().unwrap();
        assert_eq!(bounds.min, Vector3::new(-1.0, 0.0, -1.0));
        assert_eq!(bounds.max, Vector3::new(1.0, 4.0, 1.0));
    }

    #[test]
    fn test_bounds_follow_own_transform() {
        let registry = Arc::new(ResourceRegistry::new());
        let mut object = sample(&registry);
        object.translate_world(Vector3::new(10.0, 0.0, 0.0));

        let bounds = object.bounds().unwrap();
        assert_eq!(bounds.center().x, 10.0);
        assert_eq!(object.position(), Vector3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_object_has_no_bounds() {
        assert!(SceneObject::new("empty").bounds().is_none());
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let registry = Arc::new(ResourceRegistry::new());
        let original = sample(&registry);
        let mut copy = original.deep_clone();

        copy.translate_world(Vector3::new(0.0, 5.0, 0.0));
        copy.children[0].name.push_str("-copy");

        assert_eq!(original.position(), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(original.children[0].name, "shade");

        let original_ids = original.resource_ids();
        let copy_ids = copy.resource_ids();
        assert_eq!(original_ids.len(), 4);
        assert_eq!(copy_ids.len(), 4);
        assert!(copy_ids.iter().all(|id| !original_ids.contains(id)));
    }

    #[test]
    fn test_dispose_releases_every_part() {
        let registry = Arc::new(ResourceRegistry::new());
        let original = sample(&registry);
        let mut copy = original.deep_clone();
        let copy_ids = copy.resource_ids();

        copy.dispose();

        assert!(copy.is_disposed());
        assert!(copy_ids.iter().all(|id| !registry.is_live(*id)));
        assert_eq!(registry.metrics().total_count(), 4);

        // Second dispose has nothing left to release
        copy.dispose();
        assert_eq!(registry.metrics().total_count(), 4);
    }

    #[test]
    fn test_counts() {
        let registry = Arc::new(ResourceRegistry::new());
        let object = sample(&registry);
        assert_eq!(object.mesh_count(), 2);
        assert_eq!(object.vertex_count(), 16);
        assert_eq!(object.triangle_count(), 24);
    }
}
