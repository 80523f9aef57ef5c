//! glTF / GLB loading.
//!
//! The node hierarchy of the default scene is kept as-is: every glTF node
//! becomes a [`SceneObject`] with the node's local transform, and every
//! triangle primitive becomes one mesh with its metallic-roughness material.
//! Primitives without positions, or drawn with a mode other than triangles,
//! are skipped.

use std::path::Path;
use std::sync::Arc;

use cgmath::Matrix4;
use gltf::mesh::Mode;

use crate::error::DecodeError;
use crate::gfx::{
    resources::{Material, ResourceRegistry},
    scene::{vertex::calculate_face_normals, Geometry, Mesh, SceneObject, Vertex3D},
};

/// Load a `.gltf` or `.glb` file from disk
pub fn load_gltf(
    path: &Path,
    locator: &str,
    registry: &Arc<ResourceRegistry>,
) -> Result<SceneObject, DecodeError> {
    let (doc, buffers, _images) = gltf::import(path).map_err(|e| DecodeError::Malformed {
        locator: locator.to_string(),
        message: e.to_string(),
    })?;

    let scene = doc
        .default_scene()
        .or_else(|| doc.scenes().next())
        .ok_or_else(|| DecodeError::Empty {
            locator: locator.to_string(),
        })?;

    let mut root = SceneObject::new(scene.name().unwrap_or(locator));
    for node in scene.nodes() {
        root.children.push(convert_node(&node, &buffers, registry));
    }

    Ok(root)
}

fn convert_node(
    node: &gltf::Node<'_>,
    buffers: &[gltf::buffer::Data],
    registry: &Arc<ResourceRegistry>,
) -> SceneObject {
    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()));

    let mut object =
        SceneObject::new(name).with_transform(Matrix4::from(node.transform().matrix()));

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != Mode::Triangles {
                log::debug!(
                    "Skipping {:?} primitive {} of mesh {}",
                    primitive.mode(),
                    primitive.index(),
                    mesh.index()
                );
                continue;
            }
            if let Some(geometry) = read_geometry(&primitive, buffers) {
                let material = convert_material(&primitive.material()).tracked(registry);
                object
                    .meshes
                    .push(Mesh::new(geometry.tracked(registry), material));
            }
        }
    }

    for child in node.children() {
        object.children.push(convert_node(&child, buffers, registry));
    }

    object
}

fn read_geometry(
    primitive: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
) -> Option<Geometry> {
    let reader = primitive.reader(|b| buffers.get(b.index()).map(|data| data.0.as_slice()));

    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    if positions.is_empty() {
        return None;
    }

    let indices: Vec<u32> = match reader.read_indices() {
        Some(read) => read.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let normals: Vec<[f32; 3]> = match reader.read_normals() {
        Some(it) => it.collect(),
        None => {
            let flat: Vec<f32> = positions.iter().flatten().copied().collect();
            calculate_face_normals(&flat, &indices)
                .chunks_exact(3)
                .map(|n| [n[0], n[1], n[2]])
                .collect()
        }
    };

    let vertices = positions
        .iter()
        .zip(normals.iter().chain(std::iter::repeat(&[0.0, 1.0, 0.0])))
        .map(|(p, n)| Vertex3D::new(*p, *n))
        .collect();

    Some(Geometry::new(vertices, indices))
}

fn convert_material(material: &gltf::Material<'_>) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let name = material
        .name()
        .map(str::to_string)
        .or_else(|| material.index().map(|i| format!("material_{}", i)))
        .unwrap_or_else(|| "Default".to_string());

    Material::new(
        &name,
        pbr.base_color_factor(),
        pbr.metallic_factor(),
        pbr.roughness_factor(),
    )
}
