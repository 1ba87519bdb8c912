//! trispin - spinning triangle demo
//!
//! Opens a window, compiles the two shaders, uploads a triangle and rotates it
//! once per frame, sleeping between frames. Escape closes the window.

use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use trispin::config::AppConfig;
use trispin::error::AppError;
use trispin::input::{InputAction, InputMapper};
use trispin::systems::{RenderError, RenderSystem, SimulationSystem, WindowSystem};

/// Main application state
struct App {
    config: AppConfig,
    window: Option<WindowSystem>,
    render: Option<RenderSystem>,
    simulation: SimulationSystem,
    /// First fatal error; ends the event loop
    fatal: Option<AppError>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let simulation = SimulationSystem::new(&config.animation, &config.timing);
        Self {
            config,
            window: None,
            render: None,
            simulation,
            fatal: None,
        }
    }

    /// Create the window and everything that renders into it
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window = WindowSystem::create(event_loop, &self.config.window)?;
        let render = RenderSystem::new(
            window.window().clone(),
            &self.config.shaders,
            self.config.rendering.clone(),
            self.config.window.vsync,
        )?;

        let (width, height) = render.size();
        log::info!(
            "Ready: {}x{}, {:.1} deg/s, {} ms between frames",
            width,
            height,
            self.config.animation.degrees_per_second,
            self.simulation.pacer().frame_sleep().as_millis()
        );

        self.window = Some(window);
        self.render = Some(render);
        self.simulation.start(Instant::now());
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: impl Into<AppError>) {
        let err = err.into();
        log::error!("{}", err);
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        event_loop.exit();
    }

    fn handle_action(&mut self, event_loop: &ActiveEventLoop, action: InputAction) {
        match action {
            InputAction::Exit => {
                log::info!("Escape pressed, closing");
                event_loop.exit();
            }
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
            InputAction::ResetRotation => self.simulation.reset_rotation(),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let model = self.simulation.update();

        let result = match self.render.as_mut() {
            Some(render) => render.render_frame(&model),
            None => return,
        };

        match result {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => {
                if let Some(render) = self.render.as_mut() {
                    render.recover_surface();
                }
            }
            Err(e) if e.is_recoverable() => log::warn!("Skipping frame: {}", e),
            Err(e) => return self.fail(event_loop, e),
        }

        self.simulation.frame_finished(Instant::now());
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_graphics(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(render) = &mut self.render {
                    render.resize(physical_size.width, physical_size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state) {
                        self.handle_action(event_loop, action);
                    }
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };

        let pacer = self.simulation.pacer();
        if pacer.is_due(Instant::now()) {
            window.request_redraw();
            event_loop.set_control_flow(ControlFlow::Wait);
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(pacer.next_frame()));
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // GPU objects go before the window they present to
        if self.render.take().is_some() {
            log::info!("Released GPU resources");
        }
        if self.window.take().is_some() {
            log::info!("Destroyed window");
        }
    }
}

fn main() -> Result<(), AppError> {
    let loaded = AppConfig::load();

    let log_level = loaded
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    log::info!("Starting trispin");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => {
            log::info!("Shut down cleanly");
            Ok(())
        }
    }
}
