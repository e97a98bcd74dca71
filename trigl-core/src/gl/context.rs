use bitflags::bitflags;
use glow::HasContext;

bitflags! {
    /// Buffers cleared at the start of a frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearMask: u32 {
        /// `GL_COLOR_BUFFER_BIT`
        const COLOR = glow::COLOR_BUFFER_BIT;
        /// `GL_DEPTH_BUFFER_BIT`
        const DEPTH = glow::DEPTH_BUFFER_BIT;
        /// `GL_STENCIL_BUFFER_BIT`
        const STENCIL = glow::STENCIL_BUFFER_BIT;
    }
}

/// Manages simple GL state to reduce redundant state changes
#[derive(Debug, Default)]
pub struct GlState {
    // Viewport dimensions
    viewport: [i32; 4], // [x, y, width, height]

    // Clear color
    clear_color: [f32; 4],
}

impl GlState {
    /// Create a new GLState object with GL defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set viewport dimensions
    pub fn viewport(
        &mut self,
        gl: &glow::Context,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> &mut Self {
        let new_viewport = [x, y, width, height];
        if self.needs_viewport(new_viewport) {
            unsafe { gl.viewport(x, y, width, height) };
            self.viewport = new_viewport;
        }
        self
    }

    /// Set clear color
    pub fn clear_color(&mut self, gl: &glow::Context, [r, g, b, a]: [f32; 4]) -> &mut Self {
        if self.needs_clear_color([r, g, b, a]) {
            unsafe { gl.clear_color(r, g, b, a) };
            self.clear_color = [r, g, b, a];
        }
        self
    }

    /// Clear the buffers named by `mask` with the current clear values
    pub fn clear(&mut self, gl: &glow::Context, mask: ClearMask) -> &mut Self {
        if !mask.is_empty() {
            unsafe { gl.clear(mask.bits()) };
        }
        self
    }

    fn needs_viewport(&self, viewport: [i32; 4]) -> bool {
        self.viewport != viewport
    }

    fn needs_clear_color(&self, color: [f32; 4]) -> bool {
        self.clear_color != color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_mask_matches_gl_bits() {
        let mask = ClearMask::COLOR | ClearMask::DEPTH;
        assert_eq!(mask.bits(), glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        assert!(!mask.contains(ClearMask::STENCIL));
    }

    #[test]
    fn test_starts_from_gl_defaults() {
        let state = GlState::new();
        assert!(!state.needs_clear_color([0.0, 0.0, 0.0, 0.0]));
        assert!(state.needs_clear_color([0.5, 0.5, 0.5, 1.0]));
        assert!(!state.needs_viewport([0, 0, 0, 0]));
        assert!(state.needs_viewport([0, 0, 500, 500]));
    }
}
