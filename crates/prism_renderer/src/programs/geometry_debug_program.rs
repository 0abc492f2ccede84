use prism_core::DebugMode;
use wgpu::{BindGroup, BindGroupLayout, PipelineLayout, RenderPipeline, ShaderModule};

use crate::mesh::{GpuMesh, LineVertex, MeshInstance, MeshVertex};
use crate::programs::{GpuProgram, GpuProgramContext};
use crate::texture::TextureHelper;

pub struct GeometryDebugInit<'a> {
    pub globals_layout: &'a BindGroupLayout,
    /// Shared with the forward pass so one model uniform serves both.
    pub mesh_layout: &'a BindGroupLayout,
}

pub struct DebugDrawData<'a> {
    pub globals: &'a BindGroup,
    pub view_offset: u32,
    pub meshes: &'a [GpuMesh],
    pub instances: &'a [MeshInstance],
    pub mode: DebugMode,
}

/// Geometry inspection overlay: line-mode rasterization of the shaded
/// meshes plus the pre-generated normal whiskers. Reads depth against the
/// forward pass but never writes it.
pub struct GeometryDebugProgram {
    wireframe_shader: ShaderModule,
    normals_shader: ShaderModule,
    layout: PipelineLayout,
    wireframe_pipeline: Option<RenderPipeline>,
    normals_pipeline: Option<RenderPipeline>,
}

impl GeometryDebugProgram {
    fn depth_state() -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: TextureHelper::DEPTH_FORMAT,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }

    fn color_target(format: wgpu::TextureFormat) -> Option<wgpu::ColorTargetState> {
        Some(wgpu::ColorTargetState {
            format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })
    }
}

impl GpuProgram for GeometryDebugProgram {
    type InitData<'a> = GeometryDebugInit<'a>;
    type DrawData<'a> = DebugDrawData<'a>;

    fn new(ctx: &GpuProgramContext, init: Self::InitData<'_>) -> Self {
        let wireframe_shader = ctx
            .device
            .create_shader_module(wgpu::include_wgsl!("wireframe.wgsl"));
        let normals_shader = ctx
            .device
            .create_shader_module(wgpu::include_wgsl!("normals.wgsl"));

        let layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Geometry Debug Pipeline Layout"),
                bind_group_layouts: &[init.globals_layout, init.mesh_layout],
                push_constant_ranges: &[],
            });

        Self {
            wireframe_shader,
            normals_shader,
            layout,
            wireframe_pipeline: None,
            normals_pipeline: None,
        }
    }

    fn prepare(&mut self, ctx: &GpuProgramContext) {
        if self.wireframe_pipeline.is_none() {
            log::debug!("building wireframe pipeline for {:?}", ctx.surface_format);
            self.wireframe_pipeline = Some(ctx.device.create_render_pipeline(
                &wgpu::RenderPipelineDescriptor {
                    cache: None,
                    label: Some("Wireframe Pipeline"),
                    layout: Some(&self.layout),
                    vertex: wgpu::VertexState {
                        module: &self.wireframe_shader,
                        entry_point: Some("vs_main"),
                        compilation_options: Default::default(),
                        buffers: &[MeshVertex::desc()],
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &self.wireframe_shader,
                        entry_point: Some("fs_main"),
                        compilation_options: Default::default(),
                        targets: &[Self::color_target(ctx.surface_format)],
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        polygon_mode: wgpu::PolygonMode::Line,
                        cull_mode: None,
                        ..Default::default()
                    },
                    depth_stencil: Some(Self::depth_state()),
                    multisample: wgpu::MultisampleState::default(),
                    multiview: None,
                },
            ));
        }

        if self.normals_pipeline.is_none() {
            self.normals_pipeline = Some(ctx.device.create_render_pipeline(
                &wgpu::RenderPipelineDescriptor {
                    cache: None,
                    label: Some("Normals Pipeline"),
                    layout: Some(&self.layout),
                    vertex: wgpu::VertexState {
                        module: &self.normals_shader,
                        entry_point: Some("vs_main"),
                        compilation_options: Default::default(),
                        buffers: &[LineVertex::desc()],
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &self.normals_shader,
                        entry_point: Some("fs_main"),
                        compilation_options: Default::default(),
                        targets: &[Self::color_target(ctx.surface_format)],
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::LineList,
                        ..Default::default()
                    },
                    depth_stencil: Some(Self::depth_state()),
                    multisample: wgpu::MultisampleState::default(),
                    multiview: None,
                },
            ));
        }
    }

    fn invalidate(&mut self) {
        self.wireframe_pipeline = None;
        self.normals_pipeline = None;
    }

    fn record(&self, render_pass: &mut wgpu::RenderPass<'_>, data: Self::DrawData<'_>) {
        if data.mode == DebugMode::Off {
            return;
        }

        render_pass.set_bind_group(0, data.globals, &[data.view_offset]);

        if data.mode.wireframe() {
            if let Some(pipeline) = &self.wireframe_pipeline {
                render_pass.set_pipeline(pipeline);
                for instance in data.instances {
                    let mesh = &data.meshes[instance.mesh_index];
                    render_pass.set_bind_group(1, instance.bind_group(), &[]);
                    render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
            }
        }

        if data.mode.normals() {
            if let Some(pipeline) = &self.normals_pipeline {
                render_pass.set_pipeline(pipeline);
                for instance in data.instances {
                    let mesh = &data.meshes[instance.mesh_index];
                    render_pass.set_bind_group(1, instance.bind_group(), &[]);
                    render_pass.set_vertex_buffer(0, mesh.normal_lines.slice(..));
                    render_pass.draw(0..mesh.normal_line_vertex_count, 0..1);
                }
            }
        }
    }
}
