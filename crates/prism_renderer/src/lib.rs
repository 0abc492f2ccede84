pub mod bindless;
pub mod context;
pub mod globals;
pub mod material;
pub mod mesh;
pub mod programs;
pub mod renderer;
pub mod texture;
pub mod view;

pub use bindless::{TextureSlot, TextureTable};
pub use context::GpuContext;
pub use renderer::{Renderer, ViewDesc};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    #[error("adapter is missing required features: {0:?}")]
    MissingFeatures(wgpu::Features),
    #[error("failed to open device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("texture table is full (capacity {capacity})")]
    TableFull { capacity: u32 },
}
