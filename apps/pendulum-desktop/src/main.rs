use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use pendulum_common::{MeshData, OrbitDelta, SceneConfig};
use pendulum_input::{Action, InputState, OrbitKey};
use pendulum_mesh::{build_cylinder, build_sphere};
use pendulum_render::{FrameState, Session};
use pendulum_render_wgpu::PendulumRenderer;
use pendulum_tools::SessionInspector;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "pendulum-desktop", about = "Spring pendulum desktop application")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Initial window width in pixels
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 640)]
    height: u32,

    /// Sphere rings and slices
    #[arg(long, default_value_t = 200)]
    sphere_detail: u32,

    /// Spring cylinder sectors
    #[arg(long, default_value_t = 200)]
    sectors: u32,

    /// Initial camera distance from the origin
    #[arg(long, default_value_t = 60.0)]
    distance: f32,
}

impl Cli {
    fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            window_width: self.width,
            window_height: self.height,
            sphere_rings: self.sphere_detail,
            sphere_slices: self.sphere_detail,
            cylinder_sectors: self.sectors,
            camera_distance: self.distance,
            ..SceneConfig::default()
        }
    }
}

fn orbit_key(key: KeyCode) -> Option<OrbitKey> {
    match key {
        KeyCode::ArrowUp => Some(OrbitKey::Up),
        KeyCode::ArrowDown => Some(OrbitKey::Down),
        KeyCode::ArrowLeft => Some(OrbitKey::Left),
        KeyCode::ArrowRight => Some(OrbitKey::Right),
        _ => None,
    }
}

/// Window input the app reacts to, decoupled from winit's device ids.
#[derive(Debug, Clone, Copy, PartialEq)]
enum InputEvent {
    Key { key: KeyCode, pressed: bool },
    CursorMoved { x: f32, y: f32 },
    Primary { pressed: bool },
}

fn input_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(key),
                    state,
                    ..
                },
            ..
        } => Some(InputEvent::Key {
            key: *key,
            pressed: *state == ElementState::Pressed,
        }),
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::CursorMoved {
            x: position.x as f32,
            y: position.y as f32,
        }),
        WindowEvent::MouseInput {
            button: MouseButton::Left,
            state,
            ..
        } => Some(InputEvent::Primary {
            pressed: *state == ElementState::Pressed,
        }),
        _ => None,
    }
}

/// Application state.
struct AppState {
    config: SceneConfig,
    session: Session,
    input: InputState,
    sphere: MeshData,
    spring: MeshData,
    cursor: (f32, f32),
    show_inspector: bool,
    last_frame: Instant,
}

impl AppState {
    fn new(config: SceneConfig) -> Result<Self> {
        config.validate()?;
        let session = Session::new(&config)?;
        let sphere = build_sphere(config.sphere_rings, config.sphere_slices)?;
        let spring = build_cylinder(config.cylinder_sectors)?;
        tracing::info!(
            sphere_vertices = sphere.vertex_count(),
            spring_vertices = spring.vertex_count(),
            "meshes built"
        );
        Ok(Self {
            config,
            session,
            input: InputState::new(),
            sphere,
            spring,
            cursor: (0.0, 0.0),
            show_inspector: true,
            last_frame: Instant::now(),
        })
    }

    /// Apply this frame's input, then advance the session.
    fn update(&mut self, dt: f32) -> FrameState {
        let mut delta = OrbitDelta::NONE;
        for action in self.input.actions(&self.config.orbit_steps) {
            match action {
                Action::Pick { x, y } => {
                    self.session.pick(x, y);
                }
                Action::Orbit(d) => delta = d,
                Action::Noop => {}
            }
        }
        self.session.advance(delta, dt)
    }

    /// Route one input event. Events the UI consumed may not start a press,
    /// drag or orbit, but releases always land so no key or button sticks.
    fn handle_input(&mut self, event: InputEvent, consumed_by_ui: bool) {
        match event {
            InputEvent::Key { key, pressed } => {
                if pressed && consumed_by_ui {
                    return;
                }
                self.handle_key(key, pressed);
            }
            InputEvent::CursorMoved { x, y } => {
                self.cursor = (x, y);
                if !consumed_by_ui {
                    self.input.pointer(x, y);
                }
            }
            InputEvent::Primary { pressed: true } => {
                if !consumed_by_ui {
                    let (x, y) = self.cursor;
                    self.input.press_at(x, y);
                }
            }
            InputEvent::Primary { pressed: false } => self.input.set_primary(false),
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(orbit) = orbit_key(key) {
            self.input.set_key(orbit, pressed);
            return;
        }
        if pressed && key == KeyCode::F1 {
            self.show_inspector = !self.show_inspector;
        }
    }

    fn handle_resize(&mut self, width: u32, height: u32) {
        if let Err(e) = self.session.resize(width as f32, height as f32) {
            tracing::warn!("ignoring resize: {e}");
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_inspector {
            return;
        }

        let summary = SessionInspector::summary(&self.session);

        egui::SidePanel::left("inspector")
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Spring Pendulum");
                ui.separator();
                ui.label(format!("Tick: {}", summary.tick));
                ui.label(format!(
                    "Bob: ({:.2}, {:.2}, {:.2})",
                    summary.bob[0], summary.bob[1], summary.bob[2]
                ));
                ui.label(format!("Speed: {:.3}", summary.speed));
                ui.label(format!("Spring length: {:.3}", summary.spring_length));
                ui.label(format!("From rest: {:.3}", summary.equilibrium_offset));
                ui.separator();
                ui.label(format!(
                    "Camera: distance {:.1}  angle {:.2}",
                    summary.camera_distance, summary.camera_angle
                ));
                if ui.button("Reset bob to anchor").clicked() {
                    let anchor = self.session.pendulum().anchor();
                    self.session.pendulum_mut().set_position(anchor);
                }
                ui.separator();
                ui.small("F1: Toggle Inspector | Arrows: Orbit | LMB: Drag Bob");
            });
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<PendulumRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Spring Pendulum")
            .with_inner_size(PhysicalSize::new(
                self.state.config.window_width,
                self.state.config.window_height,
            ));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("find adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("pendulum_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface has no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // The window manager may not honour the requested size.
        self.state.handle_resize(config.width, config.height);

        let renderer = PendulumRenderer::new(
            &device,
            surface_format,
            config.width,
            config.height,
            &self.state.sphere,
            &self.state.spring,
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = (now - self.state.last_frame).as_secs_f32();
        self.state.last_frame = now;
        let frame = self.state.update(dt);

        let (
            Some(window),
            Some(surface),
            Some(device),
            Some(queue),
            Some(config),
            Some(egui_winit),
            Some(egui_renderer),
        ) = (
            &self.window,
            &self.surface,
            &self.device,
            &self.queue,
            &self.config,
            &mut self.egui_winit,
            &mut self.egui_renderer,
        )
        else {
            return;
        };

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(device, config);
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
            renderer.render(device, queue, &view, &frame);
        }

        let raw_input = egui_winit.take_egui_input(window);
        let state = &mut self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });

        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("failed to initialize GPU: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let consumed = match (&mut self.egui_winit, &self.window) {
            (Some(egui_winit), Some(window)) => egui_winit.on_window_event(window, &event).consumed,
            _ => false,
        };
        if let Some(input) = input_event(&event) {
            self.state.handle_input(input, consumed);
            return;
        }
        if consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    self.state.handle_resize(new_size.width, new_size.height);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
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

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("pendulum-desktop starting");

    let state = AppState::new(cli.scene_config())?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_state() -> AppState {
        AppState::new(SceneConfig {
            sphere_rings: 8,
            sphere_slices: 8,
            cylinder_sectors: 8,
            ..SceneConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn cli_defaults_match_scene_defaults() {
        let cli = Cli::parse_from(["pendulum-desktop"]);
        assert_eq!(cli.scene_config(), SceneConfig::default());
    }

    #[test]
    fn cli_overrides() {
        let cli = Cli::parse_from([
            "pendulum-desktop",
            "--width",
            "800",
            "--sphere-detail",
            "32",
            "--distance",
            "40",
        ]);
        let config = cli.scene_config();
        assert_eq!(config.window_width, 800);
        assert_eq!(config.sphere_rings, 32);
        assert_eq!(config.sphere_slices, 32);
        assert_eq!(config.camera_distance, 40.0);
    }

    #[test]
    fn rejects_degenerate_detail() {
        let config = SceneConfig {
            cylinder_sectors: 1,
            ..SceneConfig::default()
        };
        assert!(AppState::new(config).is_err());
    }

    #[test]
    fn arrow_keys_orbit() {
        let mut state = small_state();
        state.handle_key(KeyCode::ArrowDown, true);
        state.update(0.016);
        assert!((state.session.camera().distance() - 60.4).abs() < 1e-4);
        state.handle_key(KeyCode::ArrowDown, false);
        state.update(0.016);
        assert!((state.session.camera().distance() - 60.4).abs() < 1e-4);
    }

    #[test]
    fn click_picks_before_step() {
        let mut state = small_state();
        state.input.pointer(320.0, 320.0);
        state.input.press_at(320.0, 320.0);
        let frame = state.update(0.016);
        // Picked to the orbit centre, then one step from rest does not move it.
        assert!(frame.bob.length() < 1e-3);
    }

    #[test]
    fn release_over_panel_ends_drag() {
        let mut state = small_state();
        state.handle_input(InputEvent::CursorMoved { x: 400.0, y: 320.0 }, false);
        state.handle_input(InputEvent::Primary { pressed: true }, false);
        assert_eq!(state.input.take_pick(), Some((400.0, 320.0)));

        state.handle_input(InputEvent::CursorMoved { x: 100.0, y: 320.0 }, true);
        state.handle_input(InputEvent::Primary { pressed: false }, true);
        assert!(!state.input.primary_down());

        state.handle_input(InputEvent::CursorMoved { x: 500.0, y: 320.0 }, false);
        assert_eq!(state.input.take_pick(), None);
        assert_eq!(state.cursor, (500.0, 320.0));
    }

    #[test]
    fn press_over_panel_does_not_pick() {
        let mut state = small_state();
        state.handle_input(InputEvent::CursorMoved { x: 100.0, y: 320.0 }, true);
        state.handle_input(InputEvent::Primary { pressed: true }, true);
        assert!(!state.input.primary_down());
        assert_eq!(state.input.take_pick(), None);
    }

    #[test]
    fn consumed_key_release_stops_orbit() {
        let mut state = small_state();
        let down = |pressed| InputEvent::Key {
            key: KeyCode::ArrowDown,
            pressed,
        };
        state.handle_input(down(true), true);
        state.update(0.016);
        assert_eq!(state.session.camera().distance(), 60.0);

        state.handle_input(down(true), false);
        state.handle_input(down(false), true);
        state.update(0.016);
        assert_eq!(state.session.camera().distance(), 60.0);
    }

    #[test]
    fn consumed_f1_does_not_toggle_inspector() {
        let mut state = small_state();
        let f1 = InputEvent::Key {
            key: KeyCode::F1,
            pressed: true,
        };
        state.handle_input(f1, true);
        assert!(state.show_inspector);
        state.handle_input(f1, false);
        assert!(!state.show_inspector);
    }
}
