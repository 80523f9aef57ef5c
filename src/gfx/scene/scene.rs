use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::gfx::bounds::Aabb;

use super::object::SceneObject;

/// Object shared between its owner and the scene graph.
///
/// The owner keeps the strong reference; the scene only holds a weak one.
pub type SharedObject = Rc<RefCell<SceneObject>>;

/// Scene graph operations the gallery relies on.
///
/// Rendering itself happens elsewhere; implementors only need to track what
/// is attached under the scene anchor and report bounding volumes.
pub trait Renderer {
    /// Attach an object under the scene anchor
    fn attach(&mut self, object: &SharedObject);

    /// Remove an object from the scene anchor, returns whether it was attached
    fn detach(&mut self, object: &SharedObject) -> bool;

    /// Number of objects currently attached under the anchor
    fn anchor_len(&self) -> usize;

    /// Bounding volume of an object, `None` if it has no geometry
    fn compute_bounds(&self, object: &SceneObject) -> Option<Aabb> {
        object.bounds()
    }
}

/// In-memory scene with a single anchor node
#[derive(Default)]
pub struct Scene {
    anchor: Vec<Weak<RefCell<SceneObject>>>,
}

impl Scene {
    /// Creates a new empty scene
    pub fn new() -> Self {
        Self { anchor: Vec::new() }
    }

    /// Calls `visit` for every attached object that is still alive
    pub fn for_each_attached<F: FnMut(&SceneObject)>(&self, mut visit: F) {
        for object in self.anchor.iter().filter_map(Weak::upgrade) {
            visit(&object.borrow());
        }
    }

    /// Names of the attached objects, in attach order
    pub fn attached_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.for_each_attached(|object| names.push(object.name.clone()));
        names
    }

    /// Whether `object` is currently attached
    pub fn contains(&self, object: &SharedObject) -> bool {
        let target = Rc::downgrade(object);
        self.anchor.iter().any(|weak| weak.ptr_eq(&target))
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let mut statistics = SceneStatistics::default();
        self.for_each_attached(|object| {
            statistics.object_count += 1;
            statistics.mesh_count += object.mesh_count();
            statistics.total_triangles += object.triangle_count();
            statistics.total_vertices += object.vertex_count();
        });
        statistics
    }
}

impl Renderer for Scene {
    fn attach(&mut self, object: &SharedObject) {
        if self.contains(object) {
            return;
        }
        self.anchor.push(Rc::downgrade(object));
    }

    fn detach(&mut self, object: &SharedObject) -> bool {
        let target = Rc::downgrade(object);
        let found = self.anchor.iter().any(|weak| weak.ptr_eq(&target));
        // Dropped objects are pruned along the way
        self.anchor
            .retain(|weak| !weak.ptr_eq(&target) && weak.strong_count() > 0);
        found
    }

    fn anchor_len(&self) -> usize {
        self.anchor.len()
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub mesh_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}
