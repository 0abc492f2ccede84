use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, BindGroupLayout, Device};

use prism_assets::MaterialData;

use crate::bindless::TextureSlot;

/// Material constants, with texture references as table slots rather than
/// bindings. A zeroed slot samples the white fallback, so untextured
/// materials shade with their base color alone.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuMaterialUniform {
    pub base_color: [f32; 4],
    pub roughness: f32,
    pub metallic: f32,
    pub base_color_slot: u32,
    pub _padding: u32,
}

impl GpuMaterialUniform {
    pub fn new(data: &MaterialData, base_color_slot: TextureSlot) -> Self {
        Self {
            base_color: data.settings.base_color,
            roughness: data.settings.roughness,
            metallic: data.settings.metallic,
            base_color_slot: base_color_slot.0,
            _padding: 0,
        }
    }
}

pub struct GpuMaterial {
    pub bind_group: BindGroup,
}

impl GpuMaterial {
    pub fn new(device: &Device, layout: &BindGroupLayout, uniform: &GpuMaterialUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Material Uniform"),
            contents: bytemuck::bytes_of(uniform),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self { bind_group }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_matches_the_shader_struct() {
        assert_eq!(std::mem::size_of::<GpuMaterialUniform>(), 32);
    }

    #[test]
    fn untextured_material_points_at_the_white_slot() {
        let uniform = GpuMaterialUniform::new(&MaterialData::default(), TextureSlot::WHITE);
        assert_eq!(uniform.base_color_slot, 0);
        assert_eq!(uniform.base_color, [1.0, 1.0, 1.0, 1.0]);
    }
}
