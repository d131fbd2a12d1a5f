//! Claw machine arcade game.
//!
//! Per-frame pipeline: Input -> Camera -> Sim tick -> Scene compose ->
//! Render, paced at 75 Hz with drop-and-retry (early frames are skipped,
//! never queued).
//!
//! Controls:
//! - WASD: steer the claw
//! - Space: drop the claw / release a held toy
//! - Left click (facing the front): insert a coin, collect prizes
//! - Arrow keys: orbit the camera, mouse: look around
//! - Escape: quit

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use claw_machine_engine::camera::OrbitCamera;
use claw_machine_engine::config::AppConfig;
use claw_machine_engine::input::{GameAction, InputSnapshot, InputState};
use claw_machine_engine::mesh::{load_obj_candidates, unit_cube, uv_sphere, MeshData};
use claw_machine_engine::render::{GpuContext, SceneRenderer};
use claw_machine_engine::scene::{compose, MeshCatalog};
use claw_machine_engine::sim::consts::TICK_INTERVAL;
use claw_machine_engine::sim::{tick, SimState};

/// Everything that exists only while the window does.
struct AppState {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: SceneRenderer,
    input: InputState,
    camera: OrbitCamera,
    sim: SimState,
    catalog: MeshCatalog,
    started: Instant,
    last_tick: Instant,
}

struct ClawMachineApp {
    config: AppConfig,
    state: Option<AppState>,
}

impl ClawMachineApp {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// One paced frame: skip entirely if the tick interval has not elapsed.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let now = Instant::now();
        if now.duration_since(state.last_tick).as_secs_f64() < TICK_INTERVAL {
            return;
        }
        state.last_tick = now;

        if state.input.action_just_pressed(GameAction::Escape) {
            event_loop.exit();
            return;
        }

        let snapshot = InputSnapshot::capture(&state.input);
        let (dx, dy) = state.input.mouse_delta();
        state.camera.apply_mouse_delta(dx, dy);
        state.camera.orbit(snapshot.orbit_left, snapshot.orbit_right);

        tick(&mut state.sim, &snapshot, state.camera.facing_front());

        let time = state.started.elapsed().as_secs_f64();
        let list = compose(&state.sim, &state.catalog, time);

        let view = state.camera.view_matrix();
        let proj = state.camera.projection_matrix(state.gpu.aspect_ratio());
        match state
            .renderer
            .render(&state.gpu, &list, view, proj, state.camera.eye())
        {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                state.gpu.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(err) => log::warn!("surface error: {err:?}"),
        }

        state.input.end_frame();
    }
}

impl ApplicationHandler for ClawMachineApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("Claw Machine")
            .with_inner_size(LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .expect("Failed to create window"),
        );

        let gpu = GpuContext::new(Arc::clone(&window), self.config.vsync);

        let cube = unit_cube();
        let sphere = uv_sphere(24, 24);
        let toy_meshes: Vec<Option<MeshData>> = self
            .config
            .toy_models
            .iter()
            .map(|candidates| load_obj_candidates(candidates))
            .collect();

        let mut sim = SimState::new();
        for (toy, mesh) in sim.toys.iter_mut().zip(&toy_meshes) {
            if let Some(mesh) = mesh {
                toy.set_bounds(mesh.bounds.half_height, mesh.bounds.half_extents);
            }
        }

        let catalog = MeshCatalog {
            cube_vertex_count: cube.vertex_count(),
            sphere_vertex_count: sphere.vertex_count(),
            toy_vertex_counts: toy_meshes
                .iter()
                .map(|m| m.as_ref().map(MeshData::vertex_count))
                .collect(),
        };

        let renderer = SceneRenderer::new(
            &gpu,
            &cube,
            &sphere,
            &toy_meshes,
            Path::new(&self.config.signature_texture),
        );

        let now = Instant::now();
        self.state = Some(AppState {
            window,
            gpu,
            renderer,
            input: InputState::new(),
            camera: OrbitCamera::new(),
            sim,
            catalog,
            started: now,
            last_tick: now,
        });
        log::info!("machine ready, insert coin");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(state) = self.state.as_mut() {
                    state.gpu.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let (Some(state), PhysicalKey::Code(code)) =
                    (self.state.as_mut(), event.physical_key)
                {
                    state
                        .input
                        .handle_key(code, event.state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                if let Some(state) = self.state.as_mut() {
                    state
                        .input
                        .handle_mouse_button(button, button_state == ElementState::Pressed);
                }
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let (Some(state), DeviceEvent::MouseMotion { delta: (dx, dy) }) =
            (self.state.as_mut(), event)
        {
            state.input.handle_mouse_delta(dx as f32, dy as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.as_ref() {
            state.window.request_redraw();
        }
    }
}

fn main() {
    env_logger::init();

    let config = AppConfig::load(Path::new("claw_machine.json"));
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ClawMachineApp::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");
}
