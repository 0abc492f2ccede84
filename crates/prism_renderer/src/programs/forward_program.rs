use wgpu::{BindGroup, BindGroupLayout, PipelineLayout, RenderPipeline, ShaderModule};

use crate::material::GpuMaterial;
use crate::mesh::{GpuMesh, MeshInstance, MeshVertex};
use crate::programs::{GpuProgram, GpuProgramContext};
use crate::texture::TextureHelper;

pub struct ForwardInit<'a> {
    pub globals_layout: &'a BindGroupLayout,
    pub table_layout: &'a BindGroupLayout,
}

pub struct ForwardDrawData<'a> {
    pub globals: &'a BindGroup,
    pub view_offset: u32,
    pub table: &'a BindGroup,
    pub meshes: &'a [GpuMesh],
    pub materials: &'a [GpuMaterial],
    pub instances: &'a [MeshInstance],
}

/// The main shading pass. Group 0 is the frame globals, 1 the material
/// uniform, 2 the per-instance model uniform and 3 the bindless table.
pub struct ForwardProgram {
    shader: ShaderModule,
    layout: PipelineLayout,
    pub material_layout: BindGroupLayout,
    pub mesh_layout: BindGroupLayout,
    pipeline: Option<RenderPipeline>,
}

impl GpuProgram for ForwardProgram {
    type InitData<'a> = ForwardInit<'a>;
    type DrawData<'a> = ForwardDrawData<'a>;

    fn new(ctx: &GpuProgramContext, init: Self::InitData<'_>) -> Self {
        let shader = ctx
            .device
            .create_shader_module(wgpu::include_wgsl!("forward.wgsl"));

        let material_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("Material Layout"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

        let mesh_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Mesh Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Forward Pipeline Layout"),
                bind_group_layouts: &[
                    init.globals_layout,
                    &material_layout,
                    &mesh_layout,
                    init.table_layout,
                ],
                push_constant_ranges: &[],
            });

        Self {
            shader,
            layout,
            material_layout,
            mesh_layout,
            pipeline: None,
        }
    }

    fn prepare(&mut self, ctx: &GpuProgramContext) {
        if self.pipeline.is_some() {
            return;
        }

        log::debug!("building forward pipeline for {:?}", ctx.surface_format);
        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                cache: None,
                label: Some("Forward Pipeline"),
                layout: Some(&self.layout),
                vertex: wgpu::VertexState {
                    module: &self.shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[MeshVertex::desc()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &self.shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: TextureHelper::DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            });

        self.pipeline = Some(pipeline);
    }

    fn invalidate(&mut self) {
        self.pipeline = None;
    }

    fn record(&self, render_pass: &mut wgpu::RenderPass<'_>, data: Self::DrawData<'_>) {
        let Some(pipeline) = &self.pipeline else {
            return;
        };

        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, data.globals, &[data.view_offset]);
        render_pass.set_bind_group(3, data.table, &[]);

        for instance in data.instances {
            let mesh = &data.meshes[instance.mesh_index];
            let material = &data.materials[instance.material_index];

            render_pass.set_bind_group(1, &material.bind_group, &[]);
            render_pass.set_bind_group(2, instance.bind_group(), &[]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}
