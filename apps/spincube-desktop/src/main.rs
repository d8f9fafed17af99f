use anyhow::Result;
use clap::Parser;
use spincube_animation::AnimationState;
use spincube_render_wgpu::{CubeRenderer, SceneCamera};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "spincube-desktop", about = "Spinning cube demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Step the animation headlessly at 60 Hz for this many seconds and exit,
    /// instead of opening a window
    #[arg(long, value_name = "SECONDS")]
    simulate: Option<f64>,
}

/// Application state: the animation plus the camera, driven by wall-clock time.
struct AppState {
    animation: AnimationState,
    camera: SceneCamera,
    started: Instant,
}

impl AppState {
    fn new() -> Self {
        Self {
            animation: AnimationState::new(),
            camera: SceneCamera::default(),
            started: Instant::now(),
        }
    }

    /// Milliseconds since the animation loop began.
    fn frame_time_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Advance the animation to the current frame time. On an invalid
    /// timestamp the previous state is retained and the frame is skipped;
    /// the next frame retries with a fresh timestamp.
    fn tick(&mut self) {
        match self.animation.advance(self.frame_time_ms()) {
            Ok(next) => self.animation = next,
            Err(e) => {
                tracing::warn!("animation frame skipped: {e}");
            }
        }
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<CubeRenderer>,
}

impl GpuApp {
    fn new() -> Self {
        Self {
            state: AppState::new(),
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Spinning Cube")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("spincube_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

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

        self.state.camera.set_aspect(size.width, size.height);

        let renderer = CubeRenderer::new(&device, surface_format, size.width, size.height);

        // The animation clock starts now, not at process start.
        self.state.started = Instant::now();
        self.state.animation = AnimationState::new();

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    self.state.camera.set_aspect(config.width, config.height);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.state.tick();

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
                        return;
                    }
                    Err(e) => {
                        tracing::error!("surface error: {e}");
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                if let Some(renderer) = &self.renderer {
                    renderer.render(
                        device,
                        queue,
                        &view,
                        &self.state.camera,
                        self.state.animation.model_matrix(),
                    );
                }

                output.present();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Step the animator through a fixed 60 Hz timestamp sequence without a GPU.
/// Exercises the same state transitions the render loop performs.
fn run_simulation(seconds: f64) -> Result<AnimationState> {
    let frame_ms = 1000.0 / 60.0;
    let frames = (seconds * 60.0).ceil() as u64;

    let mut state = AnimationState::new();
    for frame in 0..=frames {
        state = state.advance(frame as f64 * frame_ms)?;
        tracing::debug!(
            frame,
            elapsed = state.elapsed,
            rotation_x = state.rotation_x,
            rotation_y = state.rotation_y,
            scale = state.scale,
        );
    }

    tracing::info!(
        "simulated {:.2}s: rotation_x={:.4} rotation_y={:.4} scale={:.4}",
        state.elapsed,
        state.rotation_x,
        state.rotation_y,
        state.scale,
    );
    Ok(state)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    if let Some(seconds) = cli.simulate {
        run_simulation(seconds)?;
        return Ok(());
    }

    tracing::info!("spincube-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulation_accepts_monotonic_timestamps() {
        let state = run_simulation(2.0).unwrap();
        assert!(state.elapsed >= 2.0);
        assert!((0.0..=2.0).contains(&state.scale));
    }

    #[test]
    fn tick_retains_state_on_bad_clock() {
        // Drive the animation past the clock, then tick: the frame timestamp
        // is behind the accumulated elapsed time, so the state must not move.
        let mut app = AppState::new();
        app.animation = app.animation.advance(3_600_000.0).unwrap();
        let before = app.animation;
        app.tick();
        assert_eq!(app.animation, before);
    }
}
