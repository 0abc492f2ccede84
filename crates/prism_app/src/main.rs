use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use glam::{Quat, Vec3};
use prism_assets::{ScenePayload, cube, gltf_loader, texture_file};
use prism_core::{AppConfig, Camera, DebugMode, Transform};
use prism_renderer::globals::{GpuPointLight, LightUniforms};
use prism_renderer::{Renderer, ViewDesc, view::grid_viewport};
use prism_window::{MainWindow, WindowApp, WindowSettings, run_window_app};
use winit::keyboard::KeyCode;

const CAMERA_SPEED: f32 = 5.0;
/// Radians per second for the scene's idle spin.
const SPIN_SPEED: f32 = 1.1;
/// Angular separation between the grid views' cameras.
const VIEW_YAW_STEP: f32 = 0.4;
const DEMO_LOGO_PATH: &str = "assets/prism-logo.png";

struct GeometryPipelineApp {
    config: AppConfig,
    renderer: Option<Renderer>,
    payload: Option<ScenePayload>,
    scene_root: Transform,
    camera: Camera,
    camera_transform: Transform,
    debug_mode: DebugMode,
    held_keys: HashSet<KeyCode>,
    surface_size: (u32, u32),
}

impl GeometryPipelineApp {
    fn new(config: AppConfig) -> Self {
        Self {
            surface_size: (config.window_width, config.window_height),
            debug_mode: config.debug_mode,
            config,
            renderer: None,
            payload: None,
            scene_root: Transform::default(),
            camera: Camera::default(),
            camera_transform: Transform::from_xyz(1.8, 1.4, 3.2).looking_at(Vec3::ZERO, Vec3::Y),
            held_keys: HashSet::new(),
        }
    }

    /// The scene from disk, or the built-in cube when there is none. The
    /// cube's checker stand-in is swapped for a real image if one is found
    /// next to the binary.
    fn load_payload(&self) -> ScenePayload {
        if !self.config.scene_path.is_empty() {
            match gltf_loader::load_scene(Path::new(&self.config.scene_path)) {
                Ok(payload) => return payload,
                Err(err) => {
                    log::warn!(
                        "could not load '{}': {err}; falling back to the demo cube",
                        self.config.scene_path
                    );
                }
            }
        }

        let mut payload = cube::demo_scene();
        match texture_file::load_texture(Path::new(DEMO_LOGO_PATH)) {
            Ok(texture) => payload.textures[0].1 = texture,
            Err(err) => log::debug!("no demo logo texture: {err}"),
        }
        payload
    }

    fn move_camera(&mut self, delta_seconds: f32) {
        let speed = CAMERA_SPEED * delta_seconds;
        let forward = self.camera_transform.forward();
        let right = self.camera_transform.right();

        if self.held_keys.contains(&KeyCode::KeyW) {
            self.camera_transform.translation += forward * speed;
        }
        if self.held_keys.contains(&KeyCode::KeyS) {
            self.camera_transform.translation -= forward * speed;
        }
        if self.held_keys.contains(&KeyCode::KeyA) {
            self.camera_transform.translation -= right * speed;
        }
        if self.held_keys.contains(&KeyCode::KeyD) {
            self.camera_transform.translation += right * speed;
        }
    }

    /// One camera per grid cell, fanned out around the scene so the views
    /// are distinguishable.
    fn build_views(&self) -> Vec<ViewDesc> {
        let Some(renderer) = &self.renderer else {
            return Vec::new();
        };
        let count = renderer.view_count();
        let (width, height) = self.surface_size;

        let mut camera = self.camera.clone();
        (0..count)
            .map(|index| {
                let cell = grid_viewport(index, count, width as f32, height as f32);
                camera.aspect_ratio = cell.width / cell.height.max(1.0);

                let yaw = Quat::from_rotation_y(index as f32 * VIEW_YAW_STEP);
                let transform = Transform {
                    translation: yaw * self.camera_transform.translation,
                    rotation: yaw * self.camera_transform.rotation,
                    scale: self.camera_transform.scale,
                };

                ViewDesc {
                    view_proj: camera.compute_view_projection(&transform),
                    camera_pos: transform.translation,
                }
            })
            .collect()
    }
}

impl WindowApp for GeometryPipelineApp {
    fn window_created(&mut self, window: &MainWindow) {
        let mut renderer = match Renderer::new(window, &self.config) {
            Ok(renderer) => renderer,
            Err(err) => {
                log::error!("renderer init failed: {err}");
                std::process::exit(1);
            }
        };

        let payload = self.load_payload();
        if let Some((camera, transform)) = payload.scene.camera_node() {
            self.camera = camera;
            self.camera_transform = transform;
        }

        renderer.load_scene(&payload, &self.scene_root);

        // A warm fill light next to the default camera spot.
        let mut lights = LightUniforms::default();
        lights.point_lights[0] = GpuPointLight {
            position: [2.0, 2.5, 2.0, 0.0],
            color: [1.0, 0.85, 0.7, 6.0],
        };
        lights.active_lights = 1;
        renderer.set_lights(&lights);

        self.payload = Some(payload);
        self.renderer = Some(renderer);
    }

    fn animate(&mut self, delta_seconds: f32) {
        self.scene_root.rotate_y(SPIN_SPEED * delta_seconds);
        self.move_camera(delta_seconds);

        if let (Some(renderer), Some(payload)) = (&self.renderer, &self.payload) {
            renderer.update_instances(&payload.scene.flatten(&self.scene_root));
        }
    }

    fn resized(&mut self, width: u32, height: u32) {
        self.surface_size = (width, height);
        if let Some(renderer) = &mut self.renderer {
            renderer.resized(width, height);
        }
    }

    fn redraw(&mut self) {
        let views = self.build_views();
        if let Some(renderer) = &mut self.renderer {
            renderer.render(&views, self.debug_mode);
        }
    }

    fn key_event(&mut self, code: KeyCode, pressed: bool) {
        if pressed {
            if code == KeyCode::Tab {
                self.debug_mode = self.debug_mode.next();
                log::info!("geometry debug mode: {:?}", self.debug_mode);
            }
            self.held_keys.insert(code);
        } else {
            self.held_keys.remove(&code);
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "prism.json".to_string());
    let config =
        AppConfig::load_or_default(Path::new(&config_path)).context("loading configuration")?;

    log::info!(
        "starting '{}' at {}x{}, {} view(s)",
        config.window_title,
        config.window_width,
        config.window_height,
        config.view_count
    );

    let settings = WindowSettings {
        title: config.window_title.clone(),
        width: config.window_width,
        height: config.window_height,
    };

    run_window_app(GeometryPipelineApp::new(config), settings).context("event loop failed")?;
    Ok(())
}
