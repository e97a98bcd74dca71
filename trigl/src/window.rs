use std::num::NonZeroU32;

use glutin::{
    config::{Config, ConfigTemplateBuilder, GlConfig},
    context::{
        ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentContext, NotCurrentGlContext,
        PossiblyCurrentContext, Version,
    },
    display::{Display, GetGlDisplay, GlDisplay},
    surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface},
};
use glutin_winit::DisplayBuilder;
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use trigl_core::GlslVersion;
use winit::{
    dpi::{LogicalPosition, LogicalSize},
    event_loop::ActiveEventLoop,
    window::{Window, WindowAttributes},
};

/// Window and context creation failures.
#[derive(thiserror::Error, Debug)]
pub enum WindowError {
    #[error("failed to build GL display: {0}")]
    Display(String),

    #[error("display did not create a window")]
    NoWindow,

    #[error("window has zero size: {0}x{1}")]
    ZeroSize(u32, u32),

    #[error("failed to get window handle: {0}")]
    Handle(#[from] raw_window_handle::HandleError),

    #[error("GL context error: {0}")]
    Context(#[from] glutin::error::Error),
}

/// What kind of window to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    /// Inner size in logical pixels.
    pub size: (u32, u32),
    /// Initial top-left position in logical pixels; the window manager
    /// decides when unset.
    pub position: Option<(i32, i32)>,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "OpenGL Window".to_string(),
            size: (500, 500),
            position: None,
            vsync: true,
        }
    }
}

impl WindowConfig {
    fn window_attributes(&self) -> WindowAttributes {
        let attrs = WindowAttributes::default()
            .with_title(self.title.as_str())
            .with_inner_size(LogicalSize::new(self.size.0, self.size.1))
            .with_resizable(false);

        match self.position {
            Some((x, y)) => attrs.with_position(LogicalPosition::new(x, y)),
            None => attrs,
        }
    }
}

/// A window with a current GL context and loaded GL functions.
///
/// Fields drop in declaration order: the surface and context go before the
/// window whose handle they were created from.
pub struct GlWindow {
    pub gl: glow::Context,
    pub glsl_version: GlslVersion,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    pub window: Window,
}

impl GlWindow {
    pub fn new(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self, WindowError> {
        let config_template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_depth_size(24);

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(config.window_attributes()))
            .build(event_loop, config_template, pick_config)
            .map_err(|e| WindowError::Display(e.to_string()))?;

        let window = window.ok_or(WindowError::NoWindow)?;
        let gl_display = gl_config.display();
        let raw_handle = window.window_handle()?.as_raw();

        let (not_current_context, glsl_version) =
            create_context(&gl_display, &gl_config, raw_handle)?;

        let inner = window.inner_size();
        let (width, height) = match (NonZeroU32::new(inner.width), NonZeroU32::new(inner.height)) {
            (Some(w), Some(h)) => (w, h),
            _ => return Err(WindowError::ZeroSize(inner.width, inner.height)),
        };
        let surface_attrs =
            SurfaceAttributesBuilder::<WindowSurface>::new().build(raw_handle, width, height);

        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attrs) }?;
        let gl_context = not_current_context.make_current(&gl_surface)?;

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
            tracing::warn!(error = %e, vsync = config.vsync, "unable to set swap interval");
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| gl_display.get_proc_address(name))
        };

        Ok(Self { gl, glsl_version, gl_surface, gl_context, window })
    }

    /// Framebuffer size in physical pixels.
    pub fn physical_size(&self) -> (i32, i32) {
        let s = self.window.inner_size();
        (s.width as i32, s.height as i32)
    }

    pub fn swap_buffers(&self) -> Result<(), WindowError> {
        self.gl_surface.swap_buffers(&self.gl_context)?;
        Ok(())
    }
}

/// Prefers multisampled configs.
///
/// # Panics
/// The picker must return a config; glutin's `find_configs` fails with
/// `BadConfig` before the picker runs when none match, so the iterator is
/// never empty.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .max_by_key(GlConfig::num_samples)
        .expect("display offered no GL configs")
}

/// Desktop GL 3.3 core first, GLES 3.0 when the driver has no desktop GL.
fn create_context(
    gl_display: &Display,
    gl_config: &Config,
    raw_handle: RawWindowHandle,
) -> Result<(NotCurrentContext, GlslVersion), WindowError> {
    let core_attrs = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
        .with_profile(GlProfile::Core)
        .build(Some(raw_handle));

    match unsafe { gl_display.create_context(gl_config, &core_attrs) } {
        Ok(context) => return Ok((context, GlslVersion::Gl330)),
        Err(e) => tracing::debug!(error = %e, "OpenGL 3.3 core context unavailable"),
    }

    let gles_attrs = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::Gles(Some(Version::new(3, 0))))
        .build(Some(raw_handle));

    let context = unsafe { gl_display.create_context(gl_config, &gles_attrs) }?;
    tracing::debug!("falling back to OpenGL ES 3.0 context");

    Ok((context, GlslVersion::Es300))
}

#[cfg(test)]
mod tests {
    use winit::dpi::Size;

    use super::*;

    #[test]
    fn test_default_window_config() {
        let config = WindowConfig::default();
        assert_eq!(config.title, "OpenGL Window");
        assert_eq!(config.size, (500, 500));
        assert_eq!(config.position, None);
        assert!(config.vsync);
    }

    #[test]
    fn test_window_attributes_are_fixed_size() {
        let config = WindowConfig { position: Some((100, 50)), ..WindowConfig::default() };
        let attrs = config.window_attributes();

        assert_eq!(attrs.title, "OpenGL Window");
        assert!(!attrs.resizable);
        assert!(attrs.position.is_some());
        assert_eq!(
            attrs.inner_size,
            Some(Size::Logical(LogicalSize::new(500.0, 500.0)))
        );
    }
}
