use glow::HasContext;

use crate::{
    error::Error,
    gl::{ClearMask, Drawable, RenderContext},
};

/// Per-frame settings that do not belong to any one scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSettings {
    /// Framebuffer size in physical pixels.
    pub viewport: (i32, i32),
    /// Background `r, g, b, a`.
    pub clear_color: [f32; 4],
    /// Buffers cleared before drawing.
    pub clear_mask: ClearMask,
}

impl FrameSettings {
    /// Settings that clear both color and depth.
    pub fn new(viewport: (i32, i32), clear_color: [f32; 4]) -> Self {
        Self {
            viewport,
            clear_color,
            clear_mask: ClearMask::COLOR | ClearMask::DEPTH,
        }
    }
}

/// Renders one frame: clear, draw `drawable`, flush.
///
/// Presenting the frame (buffer swap) is left to the windowing layer.
///
/// # Errors
/// Propagates errors from [`Drawable::prepare`]; the frame is cleared but
/// nothing is drawn in that case.
pub fn render_frame(
    context: &mut RenderContext,
    settings: &FrameSettings,
    drawable: &mut impl Drawable,
) -> Result<(), Error> {
    let gl = context.gl;
    let (width, height) = settings.viewport;

    context
        .state
        .viewport(gl, 0, 0, width, height)
        .clear_color(gl, settings.clear_color)
        .clear(gl, settings.clear_mask);

    drawable.prepare(context)?;
    drawable.draw(context);
    drawable.cleanup(context);

    unsafe { gl.flush() };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clears_color_and_depth() {
        let settings = FrameSettings::new((500, 500), [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(settings.clear_mask, ClearMask::COLOR | ClearMask::DEPTH);
        assert_eq!(settings.viewport, (500, 500));
    }
}
