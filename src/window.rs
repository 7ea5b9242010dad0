//! Window front-end and the per-frame loop.
//!
//! One winit application driving the whole show: each redraw advances the
//! clock, runs the engine's update pass, tessellates every tracer into the
//! mesh surface and presents it. The keyboard doubles as a minimal console:
//! digits arm a property by registry index, arrows nudge it, space pauses
//! the clock, S saves settings.

use std::path::PathBuf;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::engine::TracerEngine;
use crate::error::RunError;
use crate::input::{Input, KeyCode};
use crate::render::{GpuState, MeshSurface};
use crate::time::Time;

pub struct App {
    title: String,
    settings_path: Option<PathBuf>,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    engine: TracerEngine,
    mesh: MeshSurface,
    time: Time,
    input: Input,
}

impl App {
    pub fn new(title: impl Into<String>, engine: TracerEngine, settings_path: Option<PathBuf>) -> Self {
        Self {
            title: title.into(),
            settings_path,
            window: None,
            gpu: None,
            engine,
            mesh: MeshSurface::new(),
            time: Time::new(),
            input: Input::new(),
        }
    }

    /// Run the event loop until the window closes.
    pub fn run(mut self) -> Result<(), RunError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn save_settings(&self) {
        let Some(path) = &self.settings_path else {
            log::warn!("no settings path configured, not saving");
            return;
        };
        let settings = self.engine.registry().snapshot();
        match serde_json::to_string_pretty(&settings)
            .map_err(RunError::from)
            .and_then(|json| std::fs::write(path, json).map_err(RunError::from))
        {
            Ok(()) => log::info!("settings saved to {}", path.display()),
            Err(e) => log::error!("failed to save settings: {}", e),
        }
    }

    /// React to the console keys pressed since the last frame.
    fn handle_console_keys(&mut self, event_loop: &ActiveEventLoop) {
        if self.input.key_pressed(KeyCode::Escape) {
            event_loop.exit();
            return;
        }
        if let Some(digit) = self.input.digit_pressed() {
            self.engine.registry_mut().arm(digit as usize);
        }
        if self.input.key_pressed(KeyCode::Up) {
            self.engine.registry().nudge_armed(1.0);
        }
        if self.input.key_pressed(KeyCode::Down) {
            self.engine.registry().nudge_armed(-1.0);
        }
        if self.input.key_pressed(KeyCode::Space) {
            self.time.toggle_pause();
            log::info!(
                "clock {}",
                if self.time.is_paused() { "paused" } else { "running" }
            );
        }
        if self.input.key_pressed(KeyCode::S) {
            self.save_settings();
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        self.handle_console_keys(event_loop);
        self.input.begin_frame();

        let (elapsed, _delta) = self.time.update();
        self.engine.update(elapsed);

        self.mesh.begin_frame();
        self.engine.draw(elapsed, &mut self.mesh);

        if let Some(gpu) = &mut self.gpu {
            match gpu.render(&self.mesh) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost) => gpu.resize(winit::dpi::PhysicalSize {
                    width: gpu.config.width,
                    height: gpu.config.height,
                }),
                Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                Err(e) => log::warn!("render error: {:?}", e),
            }
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window_attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("window creation failed: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        match pollster::block_on(GpuState::new(window, self.engine.stage())) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                log::error!("GPU initialization failed: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
            }
            _ => {}
        }
    }
}
