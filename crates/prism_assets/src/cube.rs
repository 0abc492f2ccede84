//! Built-in textured cube, the demo scene used when no scene file is
//! available. 24 vertices (4 per face, so UVs and normals stay per-face)
//! and 36 indices.

use prism_core::Transform;

use crate::{
    assets::{Handle, MeshData, Vertex},
    material::{MaterialData, MaterialSettings, TextureData, TextureFormat},
    scene::{SceneData, SceneNode, ScenePayload},
};

const FACE_NORMALS: [[f32; 3]; 6] = [
    [0.0, 0.0, -1.0], // front
    [1.0, 0.0, 0.0],  // right
    [-1.0, 0.0, 0.0], // left
    [0.0, 0.0, 1.0],  // back
    [0.0, 1.0, 0.0],  // top
    [0.0, -1.0, 0.0], // bottom
];

#[rustfmt::skip]
const POSITIONS_UVS: [([f32; 3], [f32; 2]); 24] = [
    ([-0.5,  0.5, -0.5], [0.0, 0.0]), // front face
    ([ 0.5, -0.5, -0.5], [1.0, 1.0]),
    ([-0.5, -0.5, -0.5], [0.0, 1.0]),
    ([ 0.5,  0.5, -0.5], [1.0, 0.0]),

    ([ 0.5, -0.5, -0.5], [0.0, 1.0]), // right side face
    ([ 0.5,  0.5,  0.5], [1.0, 0.0]),
    ([ 0.5, -0.5,  0.5], [1.0, 1.0]),
    ([ 0.5,  0.5, -0.5], [0.0, 0.0]),

    ([-0.5,  0.5,  0.5], [0.0, 0.0]), // left side face
    ([-0.5, -0.5, -0.5], [1.0, 1.0]),
    ([-0.5, -0.5,  0.5], [0.0, 1.0]),
    ([-0.5,  0.5, -0.5], [1.0, 0.0]),

    ([ 0.5,  0.5,  0.5], [0.0, 0.0]), // back face
    ([-0.5, -0.5,  0.5], [1.0, 1.0]),
    ([ 0.5, -0.5,  0.5], [0.0, 1.0]),
    ([-0.5,  0.5,  0.5], [1.0, 0.0]),

    ([-0.5,  0.5, -0.5], [0.0, 1.0]), // top face
    ([ 0.5,  0.5,  0.5], [1.0, 0.0]),
    ([ 0.5,  0.5, -0.5], [1.0, 1.0]),
    ([-0.5,  0.5,  0.5], [0.0, 0.0]),

    ([ 0.5, -0.5,  0.5], [1.0, 1.0]), // bottom face
    ([-0.5, -0.5, -0.5], [0.0, 0.0]),
    ([ 0.5, -0.5, -0.5], [1.0, 0.0]),
    ([-0.5, -0.5,  0.5], [0.0, 1.0]),
];

#[rustfmt::skip]
const INDICES: [u32; 36] = [
     0,  1,  2,   0,  3,  1, // front face
     4,  5,  6,   4,  7,  5, // right face
     8,  9, 10,   8, 11,  9, // left face
    12, 13, 14,  12, 15, 13, // back face
    16, 17, 18,  16, 19, 17, // top face
    20, 21, 22,  20, 23, 21, // bottom face
];

pub fn cube_mesh() -> MeshData {
    let vertices = POSITIONS_UVS
        .iter()
        .enumerate()
        .map(|(i, (position, uv))| Vertex {
            position: *position,
            normal: FACE_NORMALS[i / 4],
            uv: *uv,
        })
        .collect();

    MeshData {
        vertices,
        indices: INDICES.to_vec(),
    }
}

/// 8x8 checkerboard stand-in for a real texture file, so the fallback scene
/// still exercises the bindless table.
pub fn checker_texture() -> TextureData {
    const CELLS: u32 = 8;
    let mut pixels = Vec::with_capacity((CELLS * CELLS * 4) as usize);
    for y in 0..CELLS {
        for x in 0..CELLS {
            let value = if (x + y) % 2 == 0 { 230u8 } else { 60u8 };
            pixels.extend_from_slice(&[value, value, value, 255]);
        }
    }
    TextureData {
        name: "Checker".to_string(),
        pixels,
        width: CELLS,
        height: CELLS,
        format: TextureFormat::Rgba8UnormSrgb,
    }
}

/// A complete single-node scene around the cube.
pub fn demo_scene() -> ScenePayload {
    let mesh_handle = Handle::<MeshData>::new();
    let texture_handle = Handle::<TextureData>::new();
    let material_handle = Handle::<MaterialData>::new();

    let material = MaterialData {
        settings: MaterialSettings::default(),
        diffuse_texture: Some(texture_handle.clone()),
        ..Default::default()
    };

    let scene = SceneData {
        meshes: vec![mesh_handle.clone()],
        materials: vec![material_handle.clone()],
        textures: vec![texture_handle.clone()],
        cameras: Vec::new(),
        nodes: vec![SceneNode {
            name: "Cube".to_string(),
            transform: Transform::default(),
            mesh_index: Some(0),
            material_index: Some(0),
            camera_index: None,
            children: Vec::new(),
        }],
    };

    ScenePayload {
        scene,
        textures: vec![(texture_handle, checker_texture())],
        materials: vec![(material_handle, material)],
        meshes: vec![(mesh_handle, cube_mesh())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn cube_has_four_vertices_per_face() {
        let mesh = cube_mesh();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
    }

    #[test]
    fn cube_indices_are_in_bounds() {
        let mesh = cube_mesh();
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn cube_normals_are_unit_and_axis_aligned() {
        for vertex in cube_mesh().vertices {
            let n = Vec3::from_array(vertex.normal);
            assert!((n.length() - 1.0).abs() < 1e-6);
            assert_eq!(n.abs().max_element(), 1.0);
        }
    }

    #[test]
    fn cube_triangles_wind_outward() {
        let mesh = cube_mesh();
        for tri in mesh.indices.chunks_exact(3) {
            let p = |i: usize| Vec3::from_array(mesh.vertices[tri[i] as usize].position);
            let n = Vec3::from_array(mesh.vertices[tri[0] as usize].normal);
            let geometric = (p(1) - p(0)).cross(p(2) - p(0));
            assert!(
                geometric.dot(n) > 0.0,
                "triangle {tri:?} winds against its face normal"
            );
        }
    }

    #[test]
    fn demo_scene_is_consistent() {
        let payload = demo_scene();
        payload.scene.validate().unwrap();
        assert_eq!(payload.scene.flatten(&Transform::default()).len(), 1);
        assert_eq!(payload.textures.len(), 1);
        // material references the checker texture
        assert_eq!(
            payload.materials[0].1.diffuse_texture.as_ref(),
            Some(&payload.textures[0].0)
        );
    }

    #[test]
    fn checker_texture_has_full_coverage() {
        let tex = checker_texture();
        assert_eq!(tex.pixels.len(), (tex.width * tex.height * 4) as usize);
    }
}
