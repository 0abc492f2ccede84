use glam::Mat4;
use prism_core::{Camera, Transform};

use crate::{
    AssetError,
    assets::{Handle, MeshData},
    material::{MaterialData, TextureData},
};

/// CPU-side scene graph, as imported. Indices in nodes refer to the
/// handle lists below, which line up with the artifact lists in
/// [`ScenePayload`].
#[derive(Clone, Debug, Default)]
pub struct SceneData {
    pub meshes: Vec<Handle<MeshData>>,
    pub materials: Vec<Handle<MaterialData>>,
    pub textures: Vec<Handle<TextureData>>,
    pub cameras: Vec<Camera>,

    // The Nodes (Entities)
    pub nodes: Vec<SceneNode>,
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub mesh_index: Option<usize>, // Index into the meshes list above
    pub material_index: Option<usize>,
    pub camera_index: Option<usize>,
    pub children: Vec<usize>,
}

/// One drawable, after the hierarchy has been resolved to world space.
/// The renderer's two per-frame draw loops iterate these.
#[derive(Clone, Debug)]
pub struct MeshInstanceDesc {
    pub name: String,
    pub mesh_index: usize,
    pub material_index: Option<usize>,
    pub world_transform: Mat4,
}

/// A scene plus the asset data its handles refer to, in handle-list order.
pub struct ScenePayload {
    pub scene: SceneData,
    pub textures: Vec<(Handle<TextureData>, TextureData)>,
    pub materials: Vec<(Handle<MaterialData>, MaterialData)>,
    pub meshes: Vec<(Handle<MeshData>, MeshData)>,
}

impl SceneData {
    /// Checks that every node index points into the handle lists.
    /// Loaders call this before handing a scene out.
    pub fn validate(&self) -> Result<(), AssetError> {
        for node in &self.nodes {
            if let Some(mesh) = node.mesh_index {
                if mesh >= self.meshes.len() {
                    return Err(AssetError::InvalidScene(format!(
                        "node '{}' references mesh {} of {}",
                        node.name,
                        mesh,
                        self.meshes.len()
                    )));
                }
            }
            if let Some(mat) = node.material_index {
                if mat >= self.materials.len() {
                    return Err(AssetError::InvalidScene(format!(
                        "node '{}' references material {} of {}",
                        node.name,
                        mat,
                        self.materials.len()
                    )));
                }
            }
            for &child in &node.children {
                if child >= self.nodes.len() {
                    return Err(AssetError::InvalidScene(format!(
                        "node '{}' references child {} of {}",
                        node.name,
                        child,
                        self.nodes.len()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Root nodes are the ones no other node lists as a child.
    fn root_indices(&self) -> Vec<usize> {
        let mut is_child = vec![false; self.nodes.len()];
        for node in &self.nodes {
            for &child in &node.children {
                if let Some(flag) = is_child.get_mut(child) {
                    *flag = true;
                }
            }
        }
        (0..self.nodes.len()).filter(|&i| !is_child[i]).collect()
    }

    /// Resolves the node hierarchy into a flat world-space instance list.
    /// `root` is applied on top of every node (the scene's own transform).
    pub fn flatten(&self, root: &Transform) -> Vec<MeshInstanceDesc> {
        let mut instances = Vec::new();
        let root_matrix = root.compute_matrix();
        for index in self.root_indices() {
            self.flatten_node(index, root_matrix, &mut instances);
        }
        instances
    }

    fn flatten_node(&self, index: usize, parent: Mat4, out: &mut Vec<MeshInstanceDesc>) {
        let node = &self.nodes[index];
        let world = parent * node.transform.compute_matrix();

        if let Some(mesh_index) = node.mesh_index {
            out.push(MeshInstanceDesc {
                name: node.name.clone(),
                mesh_index,
                material_index: node.material_index,
                world_transform: world,
            });
        }

        for &child in &node.children {
            self.flatten_node(child, world, out);
        }
    }

    /// First camera node in the scene, with its world transform resolved.
    pub fn camera_node(&self) -> Option<(Camera, Transform)> {
        let roots = self.root_indices();
        let mut stack: Vec<(usize, Mat4)> = roots.into_iter().map(|i| (i, Mat4::IDENTITY)).collect();
        while let Some((index, parent)) = stack.pop() {
            let node = &self.nodes[index];
            let world = parent * node.transform.compute_matrix();
            if let Some(cam) = node.camera_index.and_then(|i| self.cameras.get(i)) {
                return Some((cam.clone(), Transform::from_matrix(world)));
            }
            for &child in &node.children {
                stack.push((child, world));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn leaf(name: &str, mesh: Option<usize>, transform: Transform) -> SceneNode {
        SceneNode {
            name: name.to_string(),
            transform,
            mesh_index: mesh,
            material_index: None,
            camera_index: None,
            children: Vec::new(),
        }
    }

    fn two_level_scene() -> SceneData {
        // root (translate +x) -> child (translate +y, has mesh)
        let mut root = leaf("root", None, Transform::from_xyz(1.0, 0.0, 0.0));
        root.children = vec![1];
        SceneData {
            meshes: vec![Handle::new()],
            materials: Vec::new(),
            textures: Vec::new(),
            cameras: Vec::new(),
            nodes: vec![root, leaf("child", Some(0), Transform::from_xyz(0.0, 2.0, 0.0))],
        }
    }

    #[test]
    fn flatten_composes_parent_transforms() {
        let scene = two_level_scene();
        let instances = scene.flatten(&Transform::default());
        assert_eq!(instances.len(), 1);
        let pos = instances[0].world_transform.transform_point3(Vec3::ZERO);
        assert!((pos - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn flatten_applies_scene_root_transform() {
        let scene = two_level_scene();
        let instances = scene.flatten(&Transform::from_xyz(0.0, 0.0, -3.0));
        let pos = instances[0].world_transform.transform_point3(Vec3::ZERO);
        assert!((pos - Vec3::new(1.0, 2.0, -3.0)).length() < 1e-5);
    }

    #[test]
    fn nodes_without_meshes_produce_no_instances() {
        let scene = SceneData {
            nodes: vec![leaf("empty", None, Transform::default())],
            ..Default::default()
        };
        assert!(scene.flatten(&Transform::default()).is_empty());
    }

    #[test]
    fn validate_rejects_out_of_bounds_mesh() {
        let scene = SceneData {
            nodes: vec![leaf("bad", Some(3), Transform::default())],
            ..Default::default()
        };
        assert!(scene.validate().is_err());
    }

    #[test]
    fn validate_accepts_consistent_scene() {
        assert!(two_level_scene().validate().is_ok());
    }
}
