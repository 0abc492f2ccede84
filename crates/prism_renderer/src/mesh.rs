use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, BindGroupLayout, Device, Queue};

use prism_assets::MeshData;

/// How long the debug normal whiskers are, in model units.
pub const NORMAL_LINE_LENGTH: f32 = 0.15;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Vertex for the debug line lists (normal whiskers).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MeshUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
}

impl MeshUniform {
    pub fn from_model(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
        }
    }
}

/// One line segment per vertex, base at the surface, tip pushed out along
/// the normal. Colors encode the normal direction so flipped normals are
/// obvious at a glance. Generated once at upload; there is no geometry
/// stage to expand them on the GPU.
pub fn generate_normal_lines(mesh: &MeshData, length: f32) -> Vec<LineVertex> {
    let mut lines = Vec::with_capacity(mesh.vertices.len() * 2);
    for vertex in &mesh.vertices {
        let position = Vec3::from_array(vertex.position);
        let normal = Vec3::from_array(vertex.normal).normalize_or_zero();
        let color = (normal * 0.5 + Vec3::splat(0.5)).extend(1.0).to_array();
        lines.push(LineVertex {
            position: position.to_array(),
            color,
        });
        lines.push(LineVertex {
            position: (position + normal * length).to_array(),
            color,
        });
    }
    lines
}

pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub normal_lines: wgpu::Buffer,
    pub normal_line_vertex_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &Device, mesh: &MeshData, label: &str) -> Self {
        let vertices: Vec<MeshVertex> = mesh
            .vertices
            .iter()
            .map(|v| MeshVertex {
                position: v.position,
                normal: v.normal,
                uv: v.uv,
            })
            .collect();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let lines = generate_normal_lines(mesh, NORMAL_LINE_LENGTH);
        let normal_lines = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&lines),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            normal_lines,
            normal_line_vertex_count: lines.len() as u32,
        }
    }
}

/// A placed mesh: which mesh and material to draw, plus the per-instance
/// model uniform (group 2 in the forward pass, group 1 in the debug pass).
pub struct MeshInstance {
    pub mesh_index: usize,
    pub material_index: usize,
    buffer: wgpu::Buffer,
    bind_group: BindGroup,
}

impl MeshInstance {
    pub fn new(
        device: &Device,
        layout: &BindGroupLayout,
        mesh_index: usize,
        material_index: usize,
        model: Mat4,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Uniform"),
            contents: bytemuck::bytes_of(&MeshUniform::from_model(model)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Uniform"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            mesh_index,
            material_index,
            buffer,
            bind_group,
        }
    }

    pub fn bind_group(&self) -> &BindGroup {
        &self.bind_group
    }

    pub fn write_model(&self, queue: &Queue, model: Mat4) {
        queue.write_buffer(
            &self.buffer,
            0,
            bytemuck::bytes_of(&MeshUniform::from_model(model)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_assets::Vertex;

    fn single_vertex_mesh() -> MeshData {
        MeshData {
            vertices: vec![Vertex {
                position: [1.0, 2.0, 3.0],
                normal: [0.0, 1.0, 0.0],
                uv: [0.0, 0.0],
            }],
            indices: vec![0],
        }
    }

    #[test]
    fn one_whisker_per_vertex() {
        let lines = generate_normal_lines(&single_vertex_mesh(), 0.5);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(lines[1].position, [1.0, 2.5, 3.0]);
    }

    #[test]
    fn whisker_color_encodes_direction() {
        let lines = generate_normal_lines(&single_vertex_mesh(), 0.5);
        // +Y normal maps to (0.5, 1.0, 0.5)
        assert_eq!(lines[0].color, [0.5, 1.0, 0.5, 1.0]);
        assert_eq!(lines[0].color, lines[1].color);
    }

    #[test]
    fn identity_model_gives_identity_normal_matrix() {
        let uniform = MeshUniform::from_model(Mat4::IDENTITY);
        assert_eq!(uniform.model, uniform.normal_matrix);
    }
}
