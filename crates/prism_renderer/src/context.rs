use prism_window::MainWindow;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration, SurfaceTexture, TextureView};

use crate::RendererError;
use crate::texture::TextureHelper;

/// Features the shaders cannot run without: the bindless texture table and
/// line-mode rasterization for the wireframe overlay.
pub const REQUIRED_FEATURES: wgpu::Features = wgpu::Features::TEXTURE_BINDING_ARRAY
    .union(wgpu::Features::SAMPLED_TEXTURE_AND_STORAGE_BUFFER_ARRAY_NON_UNIFORM_INDEXING)
    .union(wgpu::Features::PARTIALLY_BOUND_BINDING_ARRAY)
    .union(wgpu::Features::POLYGON_MODE_LINE);

pub struct GpuContext {
    pub surface: Surface<'static>,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
    pub depth_view: TextureView,
}

impl GpuContext {
    pub fn new(window: &MainWindow, vsync: bool) -> Result<Self, RendererError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let surface = instance.create_surface(window.0.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let features = adapter.features();
        if !features.contains(REQUIRED_FEATURES) {
            return Err(RendererError::MissingFeatures(
                REQUIRED_FEATURES.difference(features),
            ));
        }

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Prism Device"),
            required_features: REQUIRED_FEATURES,
            required_limits: adapter.limits(),
            ..Default::default()
        }))?;

        let caps = surface.get_capabilities(&adapter);
        let size = window.0.inner_size();
        let config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: caps.formats[0],
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = TextureHelper::create_depth_texture(&device, &config, "Depth Texture");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
        })
    }

    /// Reconfigures the swapchain. A zero-sized window (minimized) is left
    /// alone; the old configuration stays until a real size arrives.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view =
            TextureHelper::create_depth_texture(&self.device, &self.config, "Depth Texture");
    }

    pub fn acquire(&self) -> Result<(SurfaceTexture, TextureView), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Ok((frame, view))
    }
}
