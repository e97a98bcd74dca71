use crate::{
    GlslVersion,
    error::Error,
    gl::{Drawable, ImmediateBatch, ImmediateRenderer, Primitive, RenderContext, Vertex},
};

/// Corners of the triangle, top first, each with its own color.
pub const RGB_TRIANGLE: [Vertex; 3] = [
    Vertex { position: [0.0, 0.5], color: [0.0, 0.0, 1.0] },
    Vertex { position: [-0.667, -0.5], color: [0.0, 1.0, 0.0] },
    Vertex { position: [0.667, -0.5], color: [1.0, 0.0, 0.0] },
];

/// A single triangle with blue, green and red corners, submitted one vertex
/// at a time every frame.
#[derive(Debug)]
#[must_use = "call `delete(gl)` before dropping to avoid GPU resource leaks"]
pub struct RgbTriangle {
    immediate: ImmediateRenderer,
}

impl RgbTriangle {
    /// Gray background.
    pub const CLEAR_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

    /// Builds the renderer the triangle is streamed through.
    ///
    /// # Errors
    /// Fails if the immediate-mode renderer cannot be created.
    pub fn new(gl: &glow::Context, glsl_version: GlslVersion) -> Result<Self, Error> {
        Ok(Self { immediate: ImmediateRenderer::new(gl, glsl_version)? })
    }

    /// Records `begin / color+vertex ×3 / end` into `batch`.
    ///
    /// # Errors
    /// Fails if `batch` already has a primitive open.
    pub fn record(batch: &mut ImmediateBatch) -> Result<(), Error> {
        batch.begin(Primitive::Triangles)?;
        for Vertex { position: [x, y], color: [r, g, b] } in RGB_TRIANGLE {
            batch.color3f(r, g, b);
            batch.vertex2f(x, y)?;
        }
        batch.end()
    }

    /// Releases the renderer's GL objects.
    pub fn delete(self, gl: &glow::Context) {
        self.immediate.delete(gl);
    }
}

impl Drawable for RgbTriangle {
    fn prepare(&mut self, context: &mut RenderContext) -> Result<(), Error> {
        Self::record(self.immediate.batch_mut())?;
        self.immediate.prepare(context)
    }

    fn draw(&self, context: &mut RenderContext) {
        self.immediate.draw(context);
    }

    fn cleanup(&mut self, context: &mut RenderContext) {
        self.immediate.cleanup(context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::DrawCommand;

    #[test]
    fn test_record_emits_one_colored_triangle() {
        let mut batch = ImmediateBatch::new();
        RgbTriangle::record(&mut batch).unwrap();

        assert_eq!(batch.vertices(), &RGB_TRIANGLE);
        assert_eq!(
            batch.commands(),
            &[DrawCommand { primitive: Primitive::Triangles, first: 0, count: 3 }]
        );
        assert!(!batch.is_open());
    }

    #[test]
    fn test_record_leaves_last_color_current() {
        let mut batch = ImmediateBatch::new();
        RgbTriangle::record(&mut batch).unwrap();
        assert_eq!(batch.current_color(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_record_into_open_batch_fails() {
        let mut batch = ImmediateBatch::new();
        batch.begin(Primitive::Points).unwrap();
        assert!(RgbTriangle::record(&mut batch).is_err());
    }

    #[test]
    fn test_triangle_is_symmetric_about_y_axis() {
        let [top, left, right] = RGB_TRIANGLE;
        assert_eq!(top.position[0], 0.0);
        assert_eq!(left.position[0], -right.position[0]);
        assert_eq!(left.position[1], right.position[1]);
    }
}
