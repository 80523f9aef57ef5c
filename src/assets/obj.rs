//! Wavefront OBJ loading via `tobj`

use std::path::Path;
use std::sync::Arc;

use crate::error::DecodeError;
use crate::gfx::{
    resources::{material::roughness_from_shininess, Material, ResourceRegistry},
    scene::{
        vertex::{calculate_face_normals, interleave},
        Geometry, Mesh, SceneObject,
    },
};

/// Loads an OBJ file with automatic material extraction.
///
/// Every model in the file becomes one mesh of the returned object. Materials
/// come from the MTL file when it can be read and fall back to the default
/// material otherwise.
pub fn load_obj(
    path: &Path,
    locator: &str,
    registry: &Arc<ResourceRegistry>,
) -> Result<SceneObject, DecodeError> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|e| DecodeError::Malformed {
        locator: locator.to_string(),
        message: e.to_string(),
    })?;

    let materials = materials.unwrap_or_else(|e| {
        log::debug!("No MTL data for '{}' ({}), using default materials", locator, e);
        Vec::new()
    });

    let mut object = SceneObject::new(object_name(locator, &models));

    for model in &models {
        let mesh = &model.mesh;
        if mesh.indices.is_empty() || mesh.positions.is_empty() {
            continue;
        }

        // Use normals from OBJ if available, otherwise calculate them
        let normals = if mesh.normals.len() == mesh.positions.len() {
            mesh.normals.clone()
        } else {
            calculate_face_normals(&mesh.positions, &mesh.indices)
        };

        let geometry = Geometry::new(interleave(&mesh.positions, &normals), mesh.indices.clone())
            .tracked(registry);

        let material = mesh
            .material_id
            .and_then(|id| materials.get(id).map(|mtl| (id, mtl)))
            .map(|(id, mtl)| convert_material(id, mtl))
            .unwrap_or_default()
            .tracked(registry);

        object.meshes.push(Mesh::new(geometry, material));
    }

    Ok(object)
}

fn object_name(locator: &str, models: &[tobj::Model]) -> String {
    models
        .first()
        .map(|m| m.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| locator.to_string())
}

fn convert_material(index: usize, mtl: &tobj::Material) -> Material {
    let name = if mtl.name.is_empty() {
        format!("material_{}", index)
    } else {
        mtl.name.clone()
    };

    let diffuse = mtl.diffuse.unwrap_or([0.8, 0.8, 0.8]);
    Material::new(
        &name,
        [diffuse[0], diffuse[1], diffuse[2], mtl.dissolve.unwrap_or(1.0)],
        0.0, // MTL has no direct metallic value
        roughness_from_shininess(mtl.shininess.unwrap_or(32.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch_dir;

    const CUBE_OBJ: &str = "\
o Cube
v -1.0 0.0 -1.0
v 1.0 0.0 -1.0
v 1.0 0.0 1.0
v -1.0 0.0 1.0
v -1.0 2.0 -1.0
v 1.0 2.0 -1.0
v 1.0 2.0 1.0
v -1.0 2.0 1.0
f 1 2 3 4
f 5 8 7 6
f 1 5 6 2
f 2 6 7 3
f 3 7 8 4
f 5 1 4 8
";

    #[test]
    fn test_load_obj_without_mtl() {
        let dir = scratch_dir("obj-cube");
        let path = dir.join("cube.obj");
        std::fs::write(&path, CUBE_OBJ).unwrap();

        let registry = Arc::new(ResourceRegistry::new());
        let object = load_obj(&path, "cube.obj", &registry).unwrap();

        assert_eq!(object.name, "Cube");
        assert_eq!(object.mesh_count(), 1);
        assert_eq!(object.triangle_count(), 12);
        assert_eq!(object.meshes[0].material.name, "Default");

        let bounds = object.bounds().unwrap();
        assert_eq!(bounds.size(), cgmath::Vector3::new(2.0, 2.0, 2.0));

        let metrics = registry.metrics();
        assert_eq!(metrics.geometry_count, 1);
        assert_eq!(metrics.material_count, 1);
        assert_eq!(metrics.geometry_bytes, object.meshes[0].geometry.byte_size());
    }

    #[test]
    fn test_load_obj_with_mtl() {
        let dir = scratch_dir("obj-mtl");
        std::fs::write(
            dir.join("tri.mtl"),
            "newmtl Brass\nKd 0.8 0.6 0.2\nNs 64.0\nd 0.5\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("tri.obj"),
            "mtllib tri.mtl\no Tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl Brass\nf 1 2 3\n",
        )
        .unwrap();

        let registry = Arc::new(ResourceRegistry::new());
        let object = load_obj(&dir.join("tri.obj"), "tri.obj", &registry).unwrap();
        let material = &object.meshes[0].material;

        assert_eq!(material.name, "Brass");
        assert_eq!(material.base_color, [0.8, 0.6, 0.2, 0.5]);
        assert!((material.roughness - 0.5).abs() < 1e-6);
        // Normals are computed when the file has none
        assert_eq!(object.meshes[0].geometry.vertices()[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_load_obj_missing_file() {
        let registry = Arc::new(ResourceRegistry::new());
        let result = load_obj(Path::new("/nonexistent/x.obj"), "x.obj", &registry);
        assert!(matches!(result, Err(DecodeError::Malformed { .. })));
        assert_eq!(registry.metrics().total_count(), 0);
    }
}
