//! Begin/end vertex submission on top of a core-profile context.
//!
//! Core profiles (and `glow`) have no `glBegin`/`glEnd`. [`ImmediateBatch`]
//! records vertices the same way the legacy API accepted them, one call per
//! vertex with a sticky current color, and [`ImmediateRenderer`] streams the
//! recorded vertices into a VBO and replays each primitive with `draw_arrays`.

use glow::HasContext;

use crate::{
    GlslVersion,
    error::Error,
    gl::{
        Drawable, RenderContext, ShaderProgram, buffer_upload_array, create_array_buffer,
        enable_vertex_attrib,
    },
};

/// Primitive topology accepted by [`ImmediateBatch::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// `GL_POINTS`
    Points,
    /// `GL_LINES`
    Lines,
    /// `GL_LINE_STRIP`
    LineStrip,
    /// `GL_TRIANGLES`
    Triangles,
    /// `GL_TRIANGLE_STRIP`
    TriangleStrip,
    /// `GL_TRIANGLE_FAN`
    TriangleFan,
}

impl Primitive {
    /// Fewest vertices for which GL draws anything at all.
    pub fn min_vertices(self) -> usize {
        match self {
            Self::Points => 1,
            Self::Lines | Self::LineStrip => 2,
            Self::Triangles | Self::TriangleStrip | Self::TriangleFan => 3,
        }
    }
}

impl From<Primitive> for u32 {
    fn from(val: Primitive) -> Self {
        use Primitive::*;

        match val {
            Points => glow::POINTS,
            Lines => glow::LINES,
            LineStrip => glow::LINE_STRIP,
            Triangles => glow::TRIANGLES,
            TriangleStrip => glow::TRIANGLE_STRIP,
            TriangleFan => glow::TRIANGLE_FAN,
        }
    }
}

/// Interleaved vertex as laid out in the stream buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Clip-space `x, y`.
    pub position: [f32; 2],
    /// Linear `r, g, b` in `0.0..=1.0`.
    pub color: [f32; 3],
}

/// One `begin`..`end` pair, resolved to a range of the vertex stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    /// Topology passed to `draw_arrays`.
    pub primitive: Primitive,
    /// Index of the first vertex in the stream.
    pub first: i32,
    /// Number of vertices, at least [`Primitive::min_vertices`].
    pub count: i32,
}

/// CPU-side recorder for begin/end style vertex submission.
#[derive(Debug)]
pub struct ImmediateBatch {
    current_color: [f32; 3],
    open: Option<OpenPrimitive>,
    vertices: Vec<Vertex>,
    commands: Vec<DrawCommand>,
}

#[derive(Debug, Clone, Copy)]
struct OpenPrimitive {
    primitive: Primitive,
    first: usize,
}

impl Default for ImmediateBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl ImmediateBatch {
    /// GL's initial current color.
    pub const DEFAULT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

    /// Empty batch with the default current color.
    pub fn new() -> Self {
        Self {
            current_color: Self::DEFAULT_COLOR,
            open: None,
            vertices: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Opens a new primitive.
    ///
    /// # Errors
    /// Fails if a primitive is already open.
    pub fn begin(&mut self, primitive: Primitive) -> Result<(), Error> {
        if let Some(open) = self.open {
            return Err(Error::nested_begin(open.primitive));
        }

        self.open = Some(OpenPrimitive { primitive, first: self.vertices.len() });
        Ok(())
    }

    /// Sets the color attached to subsequent vertices.
    pub fn color3f(&mut self, r: f32, g: f32, b: f32) {
        self.current_color = [r, g, b];
    }

    /// Appends a vertex to the open primitive using the current color.
    ///
    /// # Errors
    /// Fails outside of `begin`/`end`.
    pub fn vertex2f(&mut self, x: f32, y: f32) -> Result<(), Error> {
        if self.open.is_none() {
            return Err(Error::vertex_outside_begin());
        }

        self.vertices
            .push(Vertex { position: [x, y], color: self.current_color });
        Ok(())
    }

    /// Closes the open primitive.
    ///
    /// A primitive with fewer vertices than [`Primitive::min_vertices`] is
    /// dropped, as GL would draw nothing for it.
    ///
    /// # Errors
    /// Fails if no primitive is open.
    pub fn end(&mut self) -> Result<(), Error> {
        let open = self.open.take().ok_or_else(Error::end_without_begin)?;

        let count = self.vertices.len() - open.first;
        if count < open.primitive.min_vertices() {
            self.vertices.truncate(open.first);
            return Ok(());
        }

        self.commands.push(DrawCommand {
            primitive: open.primitive,
            first: open.first as i32,
            count: count as i32,
        });
        Ok(())
    }

    /// Hands over the recorded vertices and commands, leaving the batch
    /// empty. The current color is kept.
    ///
    /// # Errors
    /// Fails while a primitive is still open; nothing is taken then.
    pub fn take(&mut self) -> Result<(Vec<Vertex>, Vec<DrawCommand>), Error> {
        if let Some(open) = self.open {
            return Err(Error::flush_while_open(open.primitive));
        }

        Ok((std::mem::take(&mut self.vertices), std::mem::take(&mut self.commands)))
    }

    /// Drops all recorded geometry. The current color is kept.
    pub fn clear(&mut self) {
        self.open = None;
        self.vertices.clear();
        self.commands.clear();
    }

    /// Color the next vertex will get.
    pub fn current_color(&self) -> [f32; 3] {
        self.current_color
    }

    /// Whether a `begin` is waiting for its `end`.
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Whether nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Vertices of all closed primitives plus the open one.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// One command per closed primitive, in submission order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

mod attrib {
    pub const POSITION: u32 = 0;
    pub const COLOR: u32 = 1;
}

/// Streams an [`ImmediateBatch`] to the GPU and replays its draw commands.
#[derive(Debug)]
#[must_use = "call `delete(gl)` before dropping to avoid GPU resource leaks"]
pub struct ImmediateRenderer {
    shader: ShaderProgram,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    batch: ImmediateBatch,
    /// Commands uploaded by the last `prepare`, replayed by `draw`.
    uploaded: Vec<DrawCommand>,
}

impl ImmediateRenderer {
    const VERTEX_GLSL: &'static str = include_str!("../shaders/immediate.vert");
    const FRAGMENT_GLSL: &'static str = include_str!("../shaders/immediate.frag");

    /// Creates the shader program, VAO and stream VBO.
    ///
    /// # Errors
    /// Fails if any GL object cannot be created or the shaders do not build.
    pub fn new(gl: &glow::Context, glsl_version: GlslVersion) -> Result<Self, Error> {
        let vao =
            unsafe { gl.create_vertex_array() }.map_err(Error::vertex_array_creation_failed)?;
        unsafe { gl.bind_vertex_array(Some(vao)) };

        let vbo = create_array_buffer::<Vertex>(gl, "immediate-stream", &[], glow::STREAM_DRAW)?;

        const STRIDE: i32 = size_of::<Vertex>() as i32;
        enable_vertex_attrib(gl, attrib::POSITION, 2, 0, STRIDE);
        enable_vertex_attrib(gl, attrib::COLOR, 3, 2 * 4, STRIDE);

        // Unbind VAO to prevent accidental modification
        unsafe {
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }

        let shader = ShaderProgram::create(
            gl,
            &glsl_version.vertex_source(Self::VERTEX_GLSL),
            &glsl_version.fragment_source(Self::FRAGMENT_GLSL),
        )?;

        Ok(Self {
            shader,
            vao,
            vbo,
            batch: ImmediateBatch::new(),
            uploaded: Vec::new(),
        })
    }

    /// The batch recorded into before the next `prepare`.
    pub fn batch_mut(&mut self) -> &mut ImmediateBatch {
        &mut self.batch
    }

    /// Deletes the GPU resources.
    pub fn delete(self, gl: &glow::Context) {
        self.shader.delete(gl);
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
        }
    }
}

impl Drawable for ImmediateRenderer {
    fn prepare(&mut self, context: &mut RenderContext) -> Result<(), Error> {
        let (vertices, commands) = self.batch.take()?;

        let gl = context.gl;
        self.shader.use_program(gl);

        unsafe {
            gl.bind_vertex_array(Some(self.vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            buffer_upload_array(gl, glow::ARRAY_BUFFER, &vertices, glow::STREAM_DRAW);
        }

        self.uploaded = commands;

        Ok(())
    }

    fn draw(&self, context: &mut RenderContext) {
        let gl = context.gl;
        for cmd in &self.uploaded {
            unsafe { gl.draw_arrays(cmd.primitive.into(), cmd.first, cmd.count) };
        }
    }

    fn cleanup(&mut self, context: &mut RenderContext) {
        let gl = context.gl;
        unsafe {
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.use_program(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertices_take_current_color() {
        let mut batch = ImmediateBatch::new();
        batch.begin(Primitive::Triangles).unwrap();
        batch.color3f(0.0, 0.0, 1.0);
        batch.vertex2f(0.0, 0.5).unwrap();
        batch.color3f(0.0, 1.0, 0.0);
        batch.vertex2f(-0.667, -0.5).unwrap();
        batch.color3f(1.0, 0.0, 0.0);
        batch.vertex2f(0.667, -0.5).unwrap();
        batch.end().unwrap();

        let colors: Vec<_> = batch.vertices().iter().map(|v| v.color).collect();
        assert_eq!(colors, vec![[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]);
        assert_eq!(
            batch.commands(),
            &[DrawCommand { primitive: Primitive::Triangles, first: 0, count: 3 }]
        );
    }

    #[test]
    fn test_default_color_is_white() {
        let mut batch = ImmediateBatch::default();
        batch.begin(Primitive::Points).unwrap();
        batch.vertex2f(0.25, 0.25).unwrap();
        batch.end().unwrap();

        assert_eq!(batch.vertices()[0].color, ImmediateBatch::DEFAULT_COLOR);
    }

    #[test]
    fn test_color_persists_across_primitives_and_clear() {
        let mut batch = ImmediateBatch::new();
        batch.color3f(0.2, 0.4, 0.6);
        batch.begin(Primitive::Lines).unwrap();
        batch.vertex2f(0.0, 0.0).unwrap();
        batch.vertex2f(1.0, 1.0).unwrap();
        batch.end().unwrap();

        batch.clear();
        assert!(batch.is_empty());
        assert!(batch.vertices().is_empty());
        assert_eq!(batch.current_color(), [0.2, 0.4, 0.6]);

        batch.begin(Primitive::Points).unwrap();
        batch.vertex2f(0.5, 0.5).unwrap();
        batch.end().unwrap();
        assert_eq!(batch.vertices()[0].color, [0.2, 0.4, 0.6]);
    }

    #[test]
    fn test_commands_cover_contiguous_ranges() {
        let mut batch = ImmediateBatch::new();
        batch.begin(Primitive::Triangles).unwrap();
        for _ in 0..3 {
            batch.vertex2f(0.0, 0.0).unwrap();
        }
        batch.end().unwrap();

        batch.begin(Primitive::LineStrip).unwrap();
        for _ in 0..4 {
            batch.vertex2f(0.0, 0.0).unwrap();
        }
        batch.end().unwrap();

        assert_eq!(
            batch.commands(),
            &[
                DrawCommand { primitive: Primitive::Triangles, first: 0, count: 3 },
                DrawCommand { primitive: Primitive::LineStrip, first: 3, count: 4 },
            ]
        );
        assert_eq!(batch.vertices().len(), 7);
    }

    #[test]
    fn test_short_primitive_is_dropped() {
        let mut batch = ImmediateBatch::new();
        batch.begin(Primitive::Triangles).unwrap();
        batch.vertex2f(0.0, 0.0).unwrap();
        batch.vertex2f(1.0, 0.0).unwrap();
        batch.end().unwrap();

        assert!(batch.is_empty());
        assert!(batch.vertices().is_empty());
    }

    #[test]
    fn test_begin_end_misuse() {
        let mut batch = ImmediateBatch::new();

        assert_eq!(batch.vertex2f(0.0, 0.0), Err(Error::vertex_outside_begin()));
        assert_eq!(batch.end(), Err(Error::end_without_begin()));

        batch.begin(Primitive::TriangleFan).unwrap();
        assert!(batch.is_open());
        assert_eq!(
            batch.begin(Primitive::Points),
            Err(Error::nested_begin(Primitive::TriangleFan))
        );

        batch.end().unwrap();
        assert!(!batch.is_open());
    }

    #[test]
    fn test_take_while_open_fails_and_keeps_geometry() {
        let mut batch = ImmediateBatch::new();
        batch.begin(Primitive::Triangles).unwrap();
        batch.vertex2f(0.0, 0.5).unwrap();

        assert_eq!(batch.take(), Err(Error::flush_while_open(Primitive::Triangles)));
        assert!(batch.is_open());
        assert_eq!(batch.vertices().len(), 1);
    }

    #[test]
    fn test_take_empties_batch_and_keeps_color() {
        let mut batch = ImmediateBatch::new();
        batch.color3f(0.0, 1.0, 0.0);
        batch.begin(Primitive::Triangles).unwrap();
        for x in [0.0, 1.0, 2.0] {
            batch.vertex2f(x, 0.0).unwrap();
        }
        batch.end().unwrap();

        let (vertices, commands) = batch.take().unwrap();
        assert_eq!(vertices.len(), 3);
        assert_eq!(
            commands,
            vec![DrawCommand { primitive: Primitive::Triangles, first: 0, count: 3 }]
        );

        assert!(batch.is_empty());
        assert!(batch.vertices().is_empty());
        assert_eq!(batch.current_color(), [0.0, 1.0, 0.0]);

        let (vertices, commands) = batch.take().unwrap();
        assert!(vertices.is_empty());
        assert!(commands.is_empty());
    }

    #[test]
    fn test_primitive_gl_enum() {
        assert_eq!(u32::from(Primitive::Triangles), glow::TRIANGLES);
        assert_eq!(u32::from(Primitive::TriangleFan), glow::TRIANGLE_FAN);
        assert_eq!(u32::from(Primitive::Points), glow::POINTS);
        assert_eq!(Primitive::LineStrip.min_vertices(), 2);
        assert_eq!(Primitive::TriangleStrip.min_vertices(), 3);
    }

    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        assert_eq!(size_of::<Vertex>(), 5 * size_of::<f32>());
    }
}
