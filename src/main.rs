//! N-Body Trajectory Viewer
//!
//! Loads a precomputed trajectory, normalizes it and plays it back with an
//! orbit camera.
//!
//! Controls: left drag orbits, wheel zooms, O toggles trails, Space pauses,
//! R restarts, Escape quits.

mod config;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Args, ViewerConfig};
use session::Session;
use std::process::ExitCode;
use std::sync::Arc;
use trajectory_data::{load_trajectory, normalize};
use trajectory_renderer::{TrajectoryBuffers, TrajectoryRenderer};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: TrajectoryRenderer,
    buffers: TrajectoryBuffers,
}

impl GpuState {
    async fn new(window: Arc<Window>, session: &Session) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible GPU adapter")?;

        log::info!("✓ Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no texture formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = TrajectoryRenderer::new(&device, &config).await?;
        log::info!("✓ Renderer initialized");

        let buffers = TrajectoryBuffers::new(&device, session.frames());

        Ok(Self {
            surface,
            device,
            queue,
            config,
            renderer,
            buffers,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.renderer.resize(&self.config);
        }
    }

    fn render(&mut self, session: &mut Session) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let plan = session.next_frame();
        self.renderer
            .render(&self.device, &self.queue, &view, &self.buffers, &plan);

        output.present();
        Ok(())
    }
}

struct App {
    session: Session,
    window_size: winit::dpi::LogicalSize<u32>,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    /// Set when startup fails inside the event loop
    error: Option<anyhow::Error>,
}

impl App {
    fn new(session: Session, config: &ViewerConfig) -> Self {
        Self {
            session,
            window_size: winit::dpi::LogicalSize::new(config.width, config.height),
            window: None,
            gpu_state: None,
            error: None,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("N-Body Viewer")
            .with_inner_size(self.window_size);

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );

        let gpu_state = pollster::block_on(GpuState::new(window.clone(), &self.session))?;

        let size = window.inner_size();
        self.session.resize(size.width, size.height);
        log::debug!("Camera eye at {}", self.session.camera().eye());
        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        match code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::KeyO => {
                let draw_orbits = self.session.driver_mut().toggle_orbits();
                log::info!("Orbit trails {}", if draw_orbits { "on" } else { "off" });
            }
            KeyCode::Space => {
                let paused = self.session.driver_mut().toggle_pause();
                log::info!("Playback {}", if paused { "paused" } else { "resumed" });
            }
            KeyCode::KeyR => {
                self.session.driver_mut().restart();
                log::info!(
                    "Playback restarted ({} steps)",
                    self.session.driver().num_steps()
                );
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init_window(event_loop) {
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code),

            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                self.session
                    .resize(physical_size.width, physical_size.height);
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.session.left_button(state == ElementState::Pressed),

            WindowEvent::CursorMoved { position, .. } => {
                self.session
                    .cursor_moved(position.x as f32, position.y as f32);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports scrolling up as positive; up zooms in
                let y = match delta {
                    MouseScrollDelta::LineDelta(_x, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                self.session.scroll(-y);
            }

            WindowEvent::RedrawRequested => {
                if let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) {
                    match gpu_state.render(&mut self.session) {
                        Ok(()) => window.set_title(&self.session.title()),
                        Err(wgpu::SurfaceError::Lost) => gpu_state.resize(window.inner_size()),
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory");
                            event_loop.exit();
                        }
                        Err(e) => log::warn!("Render error: {e:?}"),
                    }
                }
            }

            _ => {}
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = args.resolve()?;

    log::info!("Loading trajectory from {}", config.data.display());
    let trajectory = load_trajectory(&config.data)?;
    log::info!(
        "✓ Loaded {} bodies over {} steps",
        trajectory.num_bodies(),
        trajectory.num_steps()
    );

    let session = Session::new(normalize(&trajectory), &config);
    drop(trajectory);

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(session, &config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    // RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
