//! # Vertex Data Structures
//!
//! Vertex layout shared by every decoder. The `#[repr(C)]` layout makes the
//! byte size of a geometry exact, which is what the resource registry tracks.

/// A 3D vertex with position and normal data.
///
/// # Examples
///
/// ```
/// use exhibit::gfx::scene::vertex::Vertex3D;
///
/// let vertex = Vertex3D {
///     position: [0.0, 1.0, 0.0],
///     normal: [0.0, 1.0, 0.0],
/// };
/// assert_eq!(Vertex3D::SIZE, 24);
/// # let _ = vertex;
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// 3D normal vector [nx, ny, nz] for lighting calculations
    pub normal: [f32; 3],
}

impl Vertex3D {
    pub const SIZE: usize = std::mem::size_of::<Vertex3D>();

    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Build vertices from flat position and normal arrays
pub fn interleave(positions: &[f32], normals: &[f32]) -> Vec<Vertex3D> {
    positions
        .chunks_exact(3)
        .zip(normals.chunks_exact(3))
        .map(|(p, n)| Vertex3D::new([p[0], p[1], p[2]], [n[0], n[1], n[2]]))
        .collect()
}

/// Compute averaged per-vertex normals for indexed triangles
pub fn calculate_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let mut normals = vec![0.0; vertex_count * 3];

    let vertex = |i: usize| [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
            continue;
        }

        let (v0, v1, v2) = (vertex(i0), vertex(i1), vertex(i2));
        let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
        let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];

        let face_normal = [
            edge1[1] * edge2[2] - edge1[2] * edge2[1],
            edge1[2] * edge2[0] - edge1[0] * edge2[2],
            edge1[0] * edge2[1] - edge1[1] * edge2[0],
        ];

        for &vertex_idx in &[i0, i1, i2] {
            normals[vertex_idx * 3] += face_normal[0];
            normals[vertex_idx * 3 + 1] += face_normal[1];
            normals[vertex_idx * 3 + 2] += face_normal[2];
        }
    }

    for normal in normals.chunks_exact_mut(3) {
        let length = (normal[0].powi(2) + normal[1].powi(2) + normal[2].powi(2)).sqrt();
        if length > 0.0 {
            normal.iter_mut().for_each(|c| *c /= length);
        }
    }

    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_normals_of_flat_triangle() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let normals = calculate_face_normals(&positions, &[0, 1, 2]);
        assert_eq!(normals, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_interleave() {
        let vertices = interleave(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.0]);
        assert_eq!(vertices, vec![Vertex3D::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0])]);
    }
}
