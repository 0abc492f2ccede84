use std::sync::Arc;

use prism_core::time::Time;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    error::EventLoopError,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

pub struct MainWindow(pub Arc<Window>);

impl MainWindow {
    pub fn request_redraw(&self) {
        self.0.request_redraw();
    }
}

/// What the runner drives every frame. The render pass implements this;
/// the runner owns the clock and the OS loop.
pub trait WindowApp {
    /// Called once, as soon as the OS hands us a window.
    fn window_created(&mut self, window: &MainWindow);

    /// Advance simulation state by `delta_seconds`.
    fn animate(&mut self, delta_seconds: f32);

    /// The swapchain-sized resources are stale; width/height are the new
    /// physical size (may be zero while minimized).
    fn resized(&mut self, width: u32, height: u32);

    /// Record and present one frame.
    fn redraw(&mut self);

    fn key_event(&mut self, _code: KeyCode, _pressed: bool) {}
}

/// Window settings the runner needs up front.
#[derive(Clone, Debug)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

// The State Machine that holds the App while waiting for the OS
struct PrismRunner<A: WindowApp> {
    app: A,
    settings: WindowSettings,
    window: Option<MainWindow>,
    time: Time,
}

impl<A: WindowApp> ApplicationHandler for PrismRunner<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(LogicalSize::new(self.settings.width, self.settings.height));

        match event_loop.create_window(attributes) {
            Ok(window) => {
                let window = MainWindow(Arc::new(window));
                self.app.window_created(&window);
                self.window = Some(window);
            }
            Err(err) => {
                log::error!("could not create a window: {err}");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape && state == ElementState::Pressed {
                    event_loop.exit();
                    return;
                }
                self.app.key_event(code, state == ElementState::Pressed);
            }
            WindowEvent::Resized(size) => {
                self.app.resized(size.width, size.height);
            }
            WindowEvent::CloseRequested => {
                log::info!("close requested; stopping");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                // 1. Tick the clock manually
                self.time.update();

                // 2. Advance and draw
                self.app.animate(self.time.delta_seconds());
                self.app.redraw();

                // 3. Request next frame
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }
}

pub fn run_window_app<A: WindowApp>(app: A, settings: WindowSettings) -> Result<(), EventLoopError> {
    let event_loop = EventLoop::new()?;

    // ControlFlow::Poll continuously runs the event loop, even if the OS hasn't
    // dispatched any events. This is ideal for games and similar applications.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut runner = PrismRunner {
        app,
        settings,
        window: None,
        time: Time::default(),
    };

    event_loop.run_app(&mut runner)
}
