//! Immediate-mode style triangle rendering on top of core-profile OpenGL.
//!
//! The crate is windowing-agnostic: callers create a [`glow::Context`],
//! build a [`Scene`] and call [`render_frame`] once per frame.

/// Error type shared by every fallible operation.
pub mod error;
mod frame;
/// GL plumbing: state cache, shader programs, begin/end batching.
pub mod gl;
pub mod scene;

pub use error::Error;
pub use frame::{FrameSettings, render_frame};
pub use gl::{
    ClearMask, DrawCommand, Drawable, GlState, ImmediateBatch, ImmediateRenderer, Primitive,
    RenderContext, Vertex,
};
pub use scene::{BufferedTriangle, RgbTriangle, Scene, SceneKind};

/// GL shader language target for version injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlslVersion {
    /// WebGL2 / OpenGL ES 3.0: `#version 300 es`
    Es300,
    /// OpenGL 3.3 Core: `#version 330 core`
    Gl330,
}

impl GlslVersion {
    /// `#version` line (plus precision) for vertex shaders.
    pub fn vertex_preamble(&self) -> &'static str {
        match self {
            Self::Es300 => "#version 300 es\nprecision highp float;\n",
            Self::Gl330 => "#version 330 core\n",
        }
    }

    /// `#version` line (plus precision) for fragment shaders.
    pub fn fragment_preamble(&self) -> &'static str {
        match self {
            Self::Es300 => "#version 300 es\nprecision mediump float;\n",
            Self::Gl330 => "#version 330 core\n",
        }
    }

    /// Prepends the vertex preamble to a version-less shader body.
    pub fn vertex_source(&self, body: &str) -> String {
        format!("{}{body}", self.vertex_preamble())
    }

    /// Prepends the fragment preamble to a version-less shader body.
    pub fn fragment_source(&self, body: &str) -> String {
        format!("{}{body}", self.fragment_preamble())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_directive_comes_first() {
        for version in [GlslVersion::Es300, GlslVersion::Gl330] {
            let vert = version.vertex_source("void main() {}\n");
            let frag = version.fragment_source("void main() {}\n");
            assert!(vert.starts_with("#version "));
            assert!(frag.starts_with("#version "));
            assert!(vert.ends_with("void main() {}\n"));
        }
    }

    #[test]
    fn test_es_sources_declare_precision() {
        let frag = GlslVersion::Es300.fragment_source("");
        assert!(frag.contains("precision mediump float;"));
        assert!(!GlslVersion::Gl330.fragment_source("").contains("precision"));
    }
}
