use std::collections::HashMap;

use glam::{Mat4, Vec3};
use prism_assets::{MeshInstanceDesc, ScenePayload};
use prism_core::{AppConfig, DebugMode, Transform};
use prism_window::MainWindow;
use uuid::Uuid;

use crate::RendererError;
use crate::bindless::{DEFAULT_TABLE_CAPACITY, TextureSlot, TextureTable};
use crate::context::GpuContext;
use crate::globals::{FrameGlobals, LightUniforms};
use crate::material::{GpuMaterial, GpuMaterialUniform};
use crate::mesh::{GpuMesh, MeshInstance};
use crate::programs::{
    DebugDrawData, ForwardDrawData, ForwardInit, ForwardProgram, GeometryDebugInit,
    GeometryDebugProgram, GpuProgram, GpuProgramContext,
};
use crate::view::{ViewConstants, grid_viewport};

/// Camera state for one view, resolved by the caller.
#[derive(Clone, Copy, Debug)]
pub struct ViewDesc {
    pub view_proj: Mat4,
    pub camera_pos: Vec3,
}

struct SceneGpu {
    meshes: Vec<GpuMesh>,
    materials: Vec<GpuMaterial>,
    instances: Vec<MeshInstance>,
}

/// Owns the device, the shared frame resources and the two programs, and
/// turns a flattened scene plus a list of views into frames.
pub struct Renderer {
    context: GpuContext,
    globals: FrameGlobals,
    table: TextureTable,
    forward: ForwardProgram,
    debug: GeometryDebugProgram,
    scene: Option<SceneGpu>,
}

impl Renderer {
    pub fn new(window: &MainWindow, config: &AppConfig) -> Result<Self, RendererError> {
        let context = GpuContext::new(window, config.vsync)?;

        let globals = FrameGlobals::new(&context.device, config.view_count);
        let table = TextureTable::new(&context.device, &context.queue, DEFAULT_TABLE_CAPACITY);

        let program_ctx = GpuProgramContext {
            device: &context.device,
            surface_format: context.config.format,
        };

        let forward = ForwardProgram::new(
            &program_ctx,
            ForwardInit {
                globals_layout: globals.layout(),
                table_layout: table.layout(),
            },
        );

        let debug = GeometryDebugProgram::new(
            &program_ctx,
            GeometryDebugInit {
                globals_layout: globals.layout(),
                mesh_layout: &forward.mesh_layout,
            },
        );

        Ok(Self {
            context,
            globals,
            table,
            forward,
            debug,
            scene: None,
        })
    }

    pub fn view_count(&self) -> u32 {
        self.globals.view_count()
    }

    pub fn set_lights(&self, lights: &LightUniforms) {
        self.globals.write_lights(&self.context.queue, lights);
    }

    /// Uploads a scene: meshes with their debug line buffers, textures into
    /// the bindless table, materials as slot-carrying uniforms, and one
    /// instance per flattened node. A texture that does not fit in the
    /// table degrades to the white slot.
    pub fn load_scene(&mut self, payload: &ScenePayload, root: &Transform) {
        let device = &self.context.device;
        let queue = &self.context.queue;

        let meshes: Vec<GpuMesh> = payload
            .meshes
            .iter()
            .map(|(_, data)| GpuMesh::upload(device, data, "Scene Mesh"))
            .collect();

        let mut slot_by_texture: HashMap<Uuid, TextureSlot> = HashMap::new();
        for (handle, data) in &payload.textures {
            match self.table.register(device, queue, data) {
                Ok(slot) => {
                    slot_by_texture.insert(handle.id, slot);
                }
                Err(err) => {
                    log::warn!("texture '{}' not registered: {err}", data.name);
                }
            }
        }

        let mut materials: Vec<GpuMaterial> = payload
            .materials
            .iter()
            .map(|(_, data)| {
                let slot = data
                    .diffuse_texture
                    .as_ref()
                    .and_then(|handle| slot_by_texture.get(&handle.id).copied())
                    .unwrap_or(TextureSlot::WHITE);
                GpuMaterial::new(
                    device,
                    &self.forward.material_layout,
                    &GpuMaterialUniform::new(data, slot),
                )
            })
            .collect();

        // Fallback material, used by instances whose node carries none.
        let default_material_index = materials.len();
        materials.push(GpuMaterial::new(
            device,
            &self.forward.material_layout,
            &GpuMaterialUniform::new(&Default::default(), TextureSlot::WHITE),
        ));

        let descs = payload.scene.flatten(root);
        let instances: Vec<MeshInstance> = descs
            .iter()
            .map(|desc| {
                MeshInstance::new(
                    device,
                    &self.forward.mesh_layout,
                    desc.mesh_index,
                    desc.material_index.unwrap_or(default_material_index),
                    desc.world_transform,
                )
            })
            .collect();

        log::info!(
            "scene uploaded: {} meshes, {} materials, {} textures, {} instances",
            meshes.len(),
            materials.len() - 1,
            slot_by_texture.len(),
            instances.len()
        );

        self.scene = Some(SceneGpu {
            meshes,
            materials,
            instances,
        });
    }

    /// Pushes fresh world transforms into the per-instance uniforms.
    /// `descs` must come from flattening the same scene that was loaded,
    /// so the order lines up.
    pub fn update_instances(&self, descs: &[MeshInstanceDesc]) {
        let Some(scene) = &self.scene else {
            return;
        };
        for (instance, desc) in scene.instances.iter().zip(descs) {
            instance.write_model(&self.context.queue, desc.world_transform);
        }
    }

    /// The swapchain is stale; reconfigure and drop the pipelines so the
    /// next frame rebuilds them.
    pub fn resized(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.forward.invalidate();
        self.debug.invalidate();
    }

    /// Records and presents one frame: a forward pass over every view's
    /// grid cell, then the geometry debug pass over the same instances.
    /// An unusable surface skips the frame rather than failing.
    pub fn render(&mut self, views: &[ViewDesc], mode: DebugMode) {
        if self.context.config.width == 0 || self.context.config.height == 0 {
            return;
        }

        let program_ctx = GpuProgramContext {
            device: &self.context.device,
            surface_format: self.context.config.format,
        };
        self.forward.prepare(&program_ctx);
        self.debug.prepare(&program_ctx);

        let (frame, frame_view) = match self.context.acquire() {
            Ok(pair) => pair,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = (self.context.config.width, self.context.config.height);
                self.resized(w, h);
                return;
            }
            Err(err) => {
                log::warn!("skipping frame: {err}");
                return;
            }
        };

        let view_count = (views.len() as u32).min(self.globals.view_count());
        let constants: Vec<ViewConstants> = views[..view_count as usize]
            .iter()
            .map(|v| ViewConstants::new(v.view_proj, v.camera_pos))
            .collect();
        self.globals.write_views(&self.context.queue, &constants);

        let table_bind_group = self.table.bind_group(&self.context.device).clone();

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Frame Encoder"),
                });

        let empty = SceneGpu {
            meshes: Vec::new(),
            materials: Vec::new(),
            instances: Vec::new(),
        };
        let scene = self.scene.as_ref().unwrap_or(&empty);

        let width = self.context.config.width as f32;
        let height = self.context.config.height as f32;

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Forward Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame_view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.2,
                            b: 0.3,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.context.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for index in 0..view_count {
                let cell = grid_viewport(index, view_count, width, height);
                render_pass.set_viewport(cell.x, cell.y, cell.width, cell.height, 0.0, 1.0);
                self.forward.record(
                    &mut render_pass,
                    ForwardDrawData {
                        globals: self.globals.bind_group(),
                        view_offset: self.globals.view_offset(index),
                        table: &table_bind_group,
                        meshes: &scene.meshes,
                        materials: &scene.materials,
                        instances: &scene.instances,
                    },
                );
            }
        }

        if mode != DebugMode::Off {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Geometry Debug Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame_view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.context.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for index in 0..view_count {
                let cell = grid_viewport(index, view_count, width, height);
                render_pass.set_viewport(cell.x, cell.y, cell.width, cell.height, 0.0, 1.0);
                self.debug.record(
                    &mut render_pass,
                    DebugDrawData {
                        globals: self.globals.bind_group(),
                        view_offset: self.globals.view_offset(index),
                        meshes: &scene.meshes,
                        instances: &scene.instances,
                        mode,
                    },
                );
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}
