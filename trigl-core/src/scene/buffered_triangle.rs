use glow::HasContext;

use crate::{
    GlslVersion,
    error::Error,
    gl::{Drawable, RenderContext, ShaderProgram, create_array_buffer, enable_vertex_attrib},
};

/// Top, left and right corners as `x, y, z` triples.
#[rustfmt::skip]
pub const WHITE_TRIANGLE: [f32; 9] = [
     0.0,  0.5, 0.0, // top
    -0.5, -0.5, 0.0, // left
     0.5, -0.5, 0.0, // right
];

/// A white triangle uploaded once into a static VBO and drawn with a
/// single `draw_arrays` call per frame.
#[derive(Debug)]
#[must_use = "call `delete(gl)` before dropping to avoid GPU resource leaks"]
pub struct BufferedTriangle {
    shader: ShaderProgram,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
}

impl BufferedTriangle {
    /// Black background.
    pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    const VERTEX_GLSL: &'static str = include_str!("../shaders/buffered.vert");
    const FRAGMENT_GLSL: &'static str = include_str!("../shaders/buffered.frag");

    /// Compiles the shader and uploads [`WHITE_TRIANGLE`].
    ///
    /// # Errors
    /// Fails if the shader does not build, exposes no `vp` attribute, or a
    /// buffer cannot be created.
    pub fn new(gl: &glow::Context, glsl_version: GlslVersion) -> Result<Self, Error> {
        let shader = ShaderProgram::create(
            gl,
            &glsl_version.vertex_source(Self::VERTEX_GLSL),
            &glsl_version.fragment_source(Self::FRAGMENT_GLSL),
        )?;
        let position_attrib = shader.attrib_location(gl, "vp")?;

        let vao =
            unsafe { gl.create_vertex_array() }.map_err(Error::vertex_array_creation_failed)?;
        unsafe { gl.bind_vertex_array(Some(vao)) };

        let vbo = create_array_buffer(gl, "triangle", &WHITE_TRIANGLE, glow::STATIC_DRAW)?;
        enable_vertex_attrib(gl, position_attrib, 3, 0, 3 * 4);

        // Unbind VAO to prevent accidental modification
        unsafe {
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }

        Ok(Self { shader, vao, vbo })
    }

    /// Releases the program, VAO and VBO.
    pub fn delete(self, gl: &glow::Context) {
        self.shader.delete(gl);
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
        }
    }
}

impl Drawable for BufferedTriangle {
    fn prepare(&mut self, context: &mut RenderContext) -> Result<(), Error> {
        let gl = context.gl;
        self.shader.use_program(gl);
        unsafe { gl.bind_vertex_array(Some(self.vao)) };
        Ok(())
    }

    fn draw(&self, context: &mut RenderContext) {
        unsafe { context.gl.draw_arrays(glow::TRIANGLES, 0, 3) };
    }

    fn cleanup(&mut self, context: &mut RenderContext) {
        let gl = context.gl;
        unsafe {
            gl.bind_vertex_array(None);
            gl.use_program(None);
        }
    }
}
