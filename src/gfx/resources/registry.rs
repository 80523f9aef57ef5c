//! Resource tracking for geometry and material allocations
//!
//! Every geometry and material owned by a scene object holds a [`ResourceHandle`]
//! allocated here. A handle stays live until it is explicitly released, so an
//! object that is dropped without being disposed shows up as a leak in
//! [`ResourceRegistry::metrics`].

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Identifier of a single tracked allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u64);

impl ResourceId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Kind of resource behind a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Geometry,
    Material,
}

/// Snapshot of the live allocations in a registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceMetrics {
    pub geometry_count: u32,
    pub material_count: u32,
    pub geometry_bytes: u64,
    pub material_bytes: u64,
}

impl ResourceMetrics {
    pub fn total_count(&self) -> u32 {
        self.geometry_count + self.material_count
    }

    pub fn total_bytes(&self) -> u64 {
        self.geometry_bytes + self.material_bytes
    }
}

/// Registry of live geometry and material resources
pub struct ResourceRegistry {
    next_id: AtomicU64,
    geometry_count: AtomicU32,
    material_count: AtomicU32,
    geometry_bytes: AtomicU64,
    material_bytes: AtomicU64,
    live: Mutex<HashSet<ResourceId>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            geometry_count: AtomicU32::new(0),
            material_count: AtomicU32::new(0),
            geometry_bytes: AtomicU64::new(0),
            material_bytes: AtomicU64::new(0),
            live: Mutex::new(HashSet::new()),
        }
    }

    /// Track a new allocation and hand out its handle
    pub fn allocate(self: &Arc<Self>, kind: ResourceKind, bytes: u64) -> ResourceHandle {
        let id = ResourceId(self.next_id.fetch_add(1, Ordering::Relaxed));

        match kind {
            ResourceKind::Geometry => {
                self.geometry_count.fetch_add(1, Ordering::Relaxed);
                self.geometry_bytes.fetch_add(bytes, Ordering::Relaxed);
            }
            ResourceKind::Material => {
                self.material_count.fetch_add(1, Ordering::Relaxed);
                self.material_bytes.fetch_add(bytes, Ordering::Relaxed);
            }
        }

        self.live_set().insert(id);

        ResourceHandle {
            id,
            kind,
            bytes,
            registry: Arc::clone(self),
        }
    }

    /// Whether the allocation with this id has not been released yet
    pub fn is_live(&self, id: ResourceId) -> bool {
        self.live_set().contains(&id)
    }

    /// Get current live allocation counts
    pub fn metrics(&self) -> ResourceMetrics {
        ResourceMetrics {
            geometry_count: self.geometry_count.load(Ordering::Relaxed),
            material_count: self.material_count.load(Ordering::Relaxed),
            geometry_bytes: self.geometry_bytes.load(Ordering::Relaxed),
            material_bytes: self.material_bytes.load(Ordering::Relaxed),
        }
    }

    fn free(&self, handle: &ResourceHandle) {
        if !self.live_set().remove(&handle.id) {
            return;
        }

        match handle.kind {
            ResourceKind::Geometry => {
                self.geometry_count.fetch_sub(1, Ordering::Relaxed);
                self.geometry_bytes.fetch_sub(handle.bytes, Ordering::Relaxed);
            }
            ResourceKind::Material => {
                self.material_count.fetch_sub(1, Ordering::Relaxed);
                self.material_bytes.fetch_sub(handle.bytes, Ordering::Relaxed);
            }
        }
    }

    fn live_set(&self) -> std::sync::MutexGuard<'_, HashSet<ResourceId>> {
        // The set holds plain ids, a poisoned lock leaves it consistent.
        self.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned token for one tracked allocation
#[derive(Debug)]
pub struct ResourceHandle {
    id: ResourceId,
    kind: ResourceKind,
    bytes: u64,
    registry: Arc<ResourceRegistry>,
}

impl ResourceHandle {
    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Allocate a fresh handle of the same kind and size from the same registry
    pub fn duplicate(&self) -> ResourceHandle {
        self.registry.allocate(self.kind, self.bytes)
    }

    /// Return the allocation to its registry
    pub fn release(self) {
        self.registry.free(&self);
    }
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("metrics", &self.metrics())
            .finish()
    }
}
