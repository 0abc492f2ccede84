pub mod forward_program;
pub mod geometry_debug_program;

pub use forward_program::{ForwardDrawData, ForwardInit, ForwardProgram};
pub use geometry_debug_program::{DebugDrawData, GeometryDebugInit, GeometryDebugProgram};

/// What a program needs to (re)build its pipelines.
pub struct GpuProgramContext<'a> {
    pub device: &'a wgpu::Device,
    pub surface_format: wgpu::TextureFormat,
}

/// A self-contained render technique: owns its shaders and pipelines,
/// records into a pass someone else began. Pipelines are built lazily in
/// `prepare` so a swapchain format change only costs an `invalidate`.
pub trait GpuProgram {
    type InitData<'a>;
    type DrawData<'a>;

    fn new(ctx: &GpuProgramContext, init: Self::InitData<'_>) -> Self;

    /// Build any missing pipelines. Called once per frame, before encoding.
    fn prepare(&mut self, ctx: &GpuProgramContext);

    /// Drop the pipelines; the next `prepare` rebuilds them against the
    /// current surface.
    fn invalidate(&mut self);

    fn record(&self, rpass: &mut wgpu::RenderPass<'_>, data: Self::DrawData<'_>);
}
