//! winit application shell: owns the window, the renderer and the scene, and
//! turns pointer input into camera moves and mode activations.

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::SceneConfig;
use crate::error::ViewerError;
use crate::gesture::ClickDetector;
use crate::gpu::GpuState;
use crate::scene::{RenderSink, Scene};
use crate::shape::Category;
use crate::text::default_rasterizer;
use crate::time::SceneClock;

const TITLE: &str = "Particle Morph";
/// Camera distance change per wheel line.
const ZOOM_PER_LINE: f32 = 2.0;
/// Camera distance change per wheel pixel (touchpads).
const ZOOM_PER_PIXEL: f32 = 0.05;

/// Open a window and run the display until it is closed.
///
/// The config is validated before anything is generated or any window opens.
pub fn run(config: SceneConfig) -> Result<(), ViewerError> {
    config.validate()?;

    let rasterizer = default_rasterizer(&config.text);
    let scene = Scene::new(&config, rasterizer.as_ref(), &mut rand::thread_rng());
    log::info!("generated {} particles", scene.particle_count());

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, scene);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    config: SceneConfig,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    scene: Scene,
    clock: SceneClock,
    clicks: ClickDetector,
    mouse_pressed: bool,
    cursor: Option<Vec2>,
    title: String,
    error: Option<ViewerError>,
}

impl App {
    fn new(config: SceneConfig, scene: Scene) -> Self {
        let clicks = ClickDetector::new(&config.gesture);
        Self {
            config,
            window: None,
            gpu_state: None,
            scene,
            clock: SceneClock::new(),
            clicks,
            mouse_pressed: false,
            cursor: None,
            title: String::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        log::error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let counts = [
            self.scene.group(Category::Round).len(),
            self.scene.group(Category::Angular).len(),
        ];
        let gpu_state = pollster::block_on(GpuState::new(window.clone(), &self.config, counts))?;

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn update_title(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let title = format!(
            "{TITLE} - {} - {:.0} fps",
            self.scene.mode(),
            self.clock.fps()
        );
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let time = self.clock.tick();
        let sink = self.gpu_state.as_mut().map(|g| g as &mut dyn RenderSink);
        self.scene.frame(time.elapsed, time.delta, sink);

        if let Some(gpu_state) = &mut self.gpu_state {
            match gpu_state.render() {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory, exiting");
                    event_loop.exit();
                }
                Err(e) => log::warn!("render error: {e:?}"),
            }
        }

        self.update_title();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    let position = self.cursor.unwrap_or(Vec2::ZERO);
                    if self.mouse_pressed {
                        self.clicks.press(position, Instant::now());
                    } else if self.clicks.release(position, Instant::now()) {
                        self.scene.activate();
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                if self.mouse_pressed {
                    if let (Some(last), Some(gpu_state)) = (self.cursor, &mut self.gpu_state) {
                        let delta = position - last;
                        gpu_state.camera.orbit(delta.x, delta.y);
                    }
                }
                self.cursor = Some(position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_pressed = false;
                self.cursor = None;
                self.clicks.cancel();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * ZOOM_PER_LINE,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * ZOOM_PER_PIXEL,
                };
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.camera.zoom(scroll);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
