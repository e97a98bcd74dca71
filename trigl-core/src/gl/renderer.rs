use crate::{error::Error, gl::context::GlState};

/// Rendering context that provides access to GL state.
pub struct RenderContext<'a> {
    /// The current GL context.
    pub gl: &'a glow::Context,
    /// Cached state for that context.
    pub state: &'a mut GlState,
}

/// Trait for objects that can be rendered.
pub trait Drawable {
    /// Prepares the object for rendering.
    ///
    /// Binds the shader program and vertex data, and uploads anything
    /// recorded on the CPU since the previous frame.
    ///
    /// # Errors
    /// Returns an error when pending vertex data cannot be uploaded.
    fn prepare(&mut self, context: &mut RenderContext) -> Result<(), Error>;

    /// Issues the draw calls. State is already set up by `prepare()`.
    fn draw(&self, context: &mut RenderContext);

    /// Restores GL state and unbinds whatever `prepare()` bound.
    fn cleanup(&mut self, context: &mut RenderContext);
}
