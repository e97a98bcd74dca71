use color_eyre::{Report, Result, eyre::Context};
use glow::HasContext;
use trigl_core::{FrameSettings, GlState, RenderContext, Scene, SceneKind, render_frame};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::WindowId,
};

use crate::window::{GlWindow, WindowConfig};

/// Opens the window and runs the frame loop until the window is closed.
///
/// # Errors
/// Fails if the event loop, window, GL context or scene cannot be created,
/// or if a frame fails to render.
pub fn run(window: WindowConfig, scene: SceneKind) -> Result<()> {
    let event_loop = EventLoop::new().wrap_err("failed to create event loop")?;
    let mut app = App::new(window, scene);
    event_loop
        .run_app(&mut app)
        .wrap_err("event loop failed")?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    window_config: WindowConfig,
    scene_kind: SceneKind,
    state: Option<AppState>,
    /// First fatal error; ends the event loop.
    error: Option<Report>,
}

struct AppState {
    win: GlWindow,
    gl_state: GlState,
    scene: Scene,
}

impl AppState {
    fn new(event_loop: &ActiveEventLoop, config: &WindowConfig, kind: SceneKind) -> Result<Self> {
        let win = GlWindow::new(event_loop, config).wrap_err("failed to initialize window")?;

        let version = unsafe { win.gl.get_parameter_string(glow::VERSION) };
        println!("OpenGL version {version}");
        tracing::info!(
            gl_version = %version,
            glsl = ?win.glsl_version,
            size = ?win.physical_size(),
            "GL context ready"
        );

        let scene = Scene::create(&win.gl, kind, win.glsl_version)
            .wrap_err_with(|| format!("failed to create {kind} scene"))?;

        Ok(Self { win, gl_state: GlState::new(), scene })
    }

    fn render(&mut self) -> Result<()> {
        let settings = FrameSettings::new(self.win.physical_size(), self.scene.kind().clear_color());
        let mut context = RenderContext { gl: &self.win.gl, state: &mut self.gl_state };

        render_frame(&mut context, &settings, &mut self.scene)
            .wrap_err("failed to render frame")?;
        self.win
            .swap_buffers()
            .wrap_err("failed to swap buffers")
    }

    fn delete(self) {
        self.scene.delete(&self.win.gl);
    }
}

impl App {
    fn new(window_config: WindowConfig, scene_kind: SceneKind) -> Self {
        Self { window_config, scene_kind, state: None, error: None }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Report) {
        tracing::error!(error = %error, "shutting down");
        if let Some(state) = self.state.take() {
            state.delete();
        }
        self.error.get_or_insert(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.error.is_some() {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Poll);

        match AppState::new(event_loop, &self.window_config, self.scene_kind) {
            Ok(state) => {
                state.win.window.request_redraw();
                self.state = Some(state);
            },
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            tracing::debug!("close requested");
            if let Some(state) = self.state.take() {
                state.delete();
            }
            event_loop.exit();
            return;
        }

        let Some(state) = self.state.as_mut() else {
            return;
        };

        if matches!(event, WindowEvent::RedrawRequested) {
            if let Err(e) = state.render() {
                self.fail(event_loop, e);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.as_ref() {
            state.win.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.take() {
            state.delete();
        }
    }
}
