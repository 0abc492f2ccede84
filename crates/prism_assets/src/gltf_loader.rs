use std::path::Path;

use glam::Quat;
use gltf::image::Format;
use prism_core::{Camera, Transform};

use crate::{
    AssetError,
    assets::{Handle, MeshData, Vertex},
    material::{MaterialData, MaterialSettings, TextureData, TextureFormat},
    scene::{SceneData, SceneNode, ScenePayload},
};

/// Imports a glTF/GLB file into CPU-side scene data.
///
/// `gltf::import` resolves both embedded buffer views and external URIs,
/// so textures arrive pre-decoded; we only normalize them to RGBA8.
pub fn load_scene(path: &Path) -> Result<ScenePayload, AssetError> {
    let (document, buffers, images) = gltf::import(path)?;

    // --- STEP 1: TEXTURES ---
    let mut texture_artifacts = Vec::new();
    let mut texture_map = Vec::new(); // Maps glTF image index -> our handle

    for (index, data) in images.iter().enumerate() {
        let name = document
            .images()
            .nth(index)
            .and_then(|i| i.name().map(str::to_string))
            .unwrap_or_else(|| format!("Image {index}"));

        let pixels = expand_to_rgba8(data.format, &data.pixels).ok_or_else(|| {
            AssetError::UnsupportedTextureFormat {
                name: name.clone(),
                format: format!("{:?}", data.format),
            }
        })?;

        let texture = TextureData {
            name,
            pixels,
            width: data.width,
            height: data.height,
            format: TextureFormat::Rgba8Unorm,
        };

        let handle = Handle::<TextureData>::new();
        texture_artifacts.push((handle.clone(), texture));
        texture_map.push(handle);
    }

    // --- STEP 2: MATERIALS ---
    let mut material_artifacts = Vec::new();
    let mut material_map = Vec::new();

    for mat in document.materials() {
        let pbr = mat.pbr_metallic_roughness();

        let diffuse_handle = pbr.base_color_texture().map(|info| {
            let idx = info.texture().source().index();
            // Base color is authored in sRGB; everything else stays linear.
            texture_artifacts[idx].1.format = TextureFormat::Rgba8UnormSrgb;
            texture_map[idx].clone()
        });

        let roughness_handle = pbr.metallic_roughness_texture().map(|info| {
            let idx = info.texture().source().index();
            texture_map[idx].clone()
        });

        let normal_handle = mat.normal_texture().map(|info| {
            let idx = info.texture().source().index();
            texture_map[idx].clone()
        });

        let mat_data = MaterialData {
            settings: MaterialSettings {
                base_color: pbr.base_color_factor(),
                roughness: pbr.roughness_factor(),
                metallic: pbr.metallic_factor(),
            },
            diffuse_texture: diffuse_handle,
            normal_texture: normal_handle,
            metallic_roughness_texture: roughness_handle,
        };

        let handle = Handle::<MaterialData>::new();
        material_artifacts.push((handle.clone(), mat_data));
        material_map.push(handle);
    }

    // --- STEP 3: MESHES ---
    // glTF meshes can carry several primitives; we keep the first one per
    // mesh so node indices stay one-to-one. Scenes exported with one
    // material per mesh (the common case for samples) lose nothing.
    let mut mesh_artifacts = Vec::new();
    let mut mesh_map = Vec::new();

    for mesh in document.meshes() {
        let name = mesh.name().unwrap_or("Mesh").to_string();
        let primitive = mesh
            .primitives()
            .next()
            .ok_or_else(|| AssetError::MissingPositions(name.clone()))?;
        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .map(|iter| iter.collect())
            .ok_or_else(|| AssetError::MissingPositions(name.clone()))?;

        let normals: Vec<[f32; 3]> = reader
            .read_normals()
            .map(|iter| iter.collect())
            .unwrap_or_else(|| vec![[0.0, 1.0, 0.0]; positions.len()]);

        let uvs: Vec<[f32; 2]> = reader
            .read_tex_coords(0)
            .map(|read| read.into_f32().collect())
            .unwrap_or_else(|| vec![[0.0, 0.0]; positions.len()]);

        let indices: Vec<u32> = reader
            .read_indices()
            .map(|read| read.into_u32().collect())
            .ok_or_else(|| AssetError::MissingIndices(name.clone()))?;

        // Interleave vertices (Position + Normal + UV)
        let mut vertices = Vec::with_capacity(positions.len());
        for i in 0..positions.len() {
            vertices.push(Vertex {
                position: positions[i],
                normal: normals[i],
                uv: uvs[i],
            });
        }

        let handle = Handle::<MeshData>::new();
        mesh_artifacts.push((handle.clone(), MeshData { vertices, indices }));
        mesh_map.push(handle);
    }

    // --- STEP 4: NODES (The Hierarchy) ---
    let mut scene_nodes = Vec::new();

    for node in document.nodes() {
        let (t, r, s) = node.transform().decomposed();

        let transform = Transform {
            translation: t.into(),
            rotation: Quat::from_array(r),
            scale: s.into(),
        };

        // In glTF, materials hang off mesh primitives, not nodes; we take
        // the one used by the mesh's first primitive.
        let material_index = node
            .mesh()
            .and_then(|m| m.primitives().next())
            .and_then(|p| p.material().index());

        scene_nodes.push(SceneNode {
            name: node.name().unwrap_or("Node").to_string(),
            transform,
            mesh_index: node.mesh().map(|m| m.index()),
            material_index,
            camera_index: node.camera().map(|cam| cam.index()),
            children: node.children().map(|c| c.index()).collect(),
        });
    }

    let cameras: Vec<_> = document
        .cameras()
        .map(|c| match c.projection() {
            gltf::camera::Projection::Orthographic(_) => Camera::default(),
            gltf::camera::Projection::Perspective(perspective) => Camera {
                fov: perspective.yfov(),
                aspect_ratio: perspective.aspect_ratio().unwrap_or(16.0 / 9.0),
                near: perspective.znear(),
                far: perspective.zfar().unwrap_or(100.0),
            },
        })
        .collect();

    let scene = SceneData {
        nodes: scene_nodes,
        textures: texture_map,
        materials: material_map,
        meshes: mesh_map,
        cameras,
    };
    scene.validate()?;

    log::info!(
        "imported scene '{}': {} nodes, {} meshes, {} materials, {} textures",
        path.display(),
        scene.nodes.len(),
        scene.meshes.len(),
        scene.materials.len(),
        texture_artifacts.len(),
    );

    Ok(ScenePayload {
        scene,
        textures: texture_artifacts,
        materials: material_artifacts,
        meshes: mesh_artifacts,
    })
}

/// Normalizes the decoded pixel formats glTF can hand us to tightly packed
/// RGBA8. Returns `None` for float/16-bit sources.
fn expand_to_rgba8(format: Format, pixels: &[u8]) -> Option<Vec<u8>> {
    match format {
        Format::R8G8B8A8 => Some(pixels.to_vec()),
        Format::R8G8B8 => {
            let mut out = Vec::with_capacity(pixels.len() / 3 * 4);
            for chunk in pixels.chunks_exact(3) {
                out.extend_from_slice(chunk);
                out.push(255);
            }
            Some(out)
        }
        Format::R8G8 => {
            let mut out = Vec::with_capacity(pixels.len() * 2);
            for chunk in pixels.chunks_exact(2) {
                out.extend_from_slice(&[chunk[0], chunk[1], 0, 255]);
            }
            Some(out)
        }
        Format::R8 => {
            let mut out = Vec::with_capacity(pixels.len() * 4);
            for &value in pixels {
                out.extend_from_slice(&[value, value, value, 255]);
            }
            Some(out)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_expands_with_opaque_alpha() {
        let out = expand_to_rgba8(Format::R8G8B8, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(out, vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn gray_broadcasts_to_rgb() {
        let out = expand_to_rgba8(Format::R8, &[7]).unwrap();
        assert_eq!(out, vec![7, 7, 7, 255]);
    }

    #[test]
    fn rgba_passes_through() {
        let out = expand_to_rgba8(Format::R8G8B8A8, &[9, 8, 7, 6]).unwrap();
        assert_eq!(out, vec![9, 8, 7, 6]);
    }

    #[test]
    fn float_formats_are_rejected() {
        assert!(expand_to_rgba8(Format::R32G32B32A32FLOAT, &[0; 16]).is_none());
    }
}
