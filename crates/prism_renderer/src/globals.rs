use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, BindGroupLayout, Device, Queue};

use crate::view::{VIEW_SLICE_SIZE, ViewConstants, ViewSlices};

pub const MAX_POINT_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct GpuPointLight {
    pub position: [f32; 4],
    pub color: [f32; 4], // w = intensity
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LightUniforms {
    pub sun_direction: [f32; 4],
    pub sun_color: [f32; 4], // w = intensity
    pub point_lights: [GpuPointLight; MAX_POINT_LIGHTS],
    pub active_lights: u32,
    pub _padding: [u32; 3],
}

impl Default for LightUniforms {
    fn default() -> Self {
        Self {
            sun_direction: Vec3::new(-0.4, -1.0, -0.3).normalize().extend(0.0).to_array(),
            sun_color: Vec4::new(1.0, 1.0, 0.95, 3.0).to_array(),
            point_lights: [GpuPointLight::default(); MAX_POINT_LIGHTS],
            active_lights: 0,
            _padding: [0; 3],
        }
    }
}

/// Group 0 for every program: the per-view constants slice (dynamic offset)
/// and the frame's lights.
pub struct FrameGlobals {
    layout: BindGroupLayout,
    bind_group: BindGroup,
    views: ViewSlices,
    lights_buffer: wgpu::Buffer,
}

impl FrameGlobals {
    pub fn new(device: &Device, view_count: u32) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Globals Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: NonZeroU64::new(VIEW_SLICE_SIZE),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let views = ViewSlices::new(device, view_count);

        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Uniforms"),
            contents: bytemuck::bytes_of(&LightUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Globals"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &views.buffer,
                        offset: 0,
                        size: NonZeroU64::new(VIEW_SLICE_SIZE),
                    }),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });

        Self {
            layout,
            bind_group,
            views,
            lights_buffer,
        }
    }

    pub fn layout(&self) -> &BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &BindGroup {
        &self.bind_group
    }

    pub fn view_count(&self) -> u32 {
        self.views.count()
    }

    pub fn view_offset(&self, index: u32) -> u32 {
        self.views.offset_for(index)
    }

    pub fn write_views(&self, queue: &Queue, views: &[ViewConstants]) {
        self.views.write(queue, views);
    }

    pub fn write_lights(&self, queue: &Queue, lights: &LightUniforms) {
        queue.write_buffer(&self.lights_buffer, 0, bytemuck::bytes_of(lights));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_uniforms_match_the_shader_struct() {
        // vec4 + vec4 + 4 point lights (2 vec4 each) + u32 + pad
        assert_eq!(std::mem::size_of::<LightUniforms>(), 176);
    }

    #[test]
    fn default_sun_points_down() {
        let lights = LightUniforms::default();
        assert!(lights.sun_direction[1] < 0.0);
        assert_eq!(lights.active_lights, 0);
    }
}
