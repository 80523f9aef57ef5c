//! Axis-aligned bounding boxes
//!
//! Used to center decoded models in the gallery viewport regardless of their
//! raw dimensions.

use cgmath::{Matrix4, Vector3, Vector4};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl Aabb {
    /// Create a new AABB
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all points, `None` for an empty set
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector3<f32>>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;

        Some(points.fold(Self::new(first, first), |mut aabb, p| {
            aabb.extend(p);
            aabb
        }))
    }

    /// Grow the box to contain `point`
    pub fn extend(&mut self, point: Vector3<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut merged = *self;
        merged.extend(other.min);
        merged.extend(other.max);
        merged
    }

    /// Box enclosing this box after applying `transform`
    pub fn transformed(&self, transform: &Matrix4<f32>) -> Aabb {
        let corners = (0..8).map(|i| {
            let corner = Vector4::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
                1.0,
            );
            (transform * corner).truncate()
        });

        // Eight corners, never empty
        Aabb::from_points(corners).unwrap_or(*self)
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}
