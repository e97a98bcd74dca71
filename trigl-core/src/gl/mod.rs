mod buffer;
pub(crate) mod context;
pub(crate) mod immediate;
mod program;
pub(crate) mod renderer;

// Primary API re-exports
pub use context::{ClearMask, GlState};
pub use immediate::{DrawCommand, ImmediateBatch, ImmediateRenderer, Primitive, Vertex};
pub use renderer::{Drawable, RenderContext};

// Crate-internal re-exports
pub(crate) use buffer::*;
pub(crate) use program::*;
