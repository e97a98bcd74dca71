//! The drawable content of a window, chosen once at startup.

mod buffered_triangle;
mod rgb_triangle;

use std::{fmt, str::FromStr};

pub use buffered_triangle::{BufferedTriangle, WHITE_TRIANGLE};
pub use rgb_triangle::{RGB_TRIANGLE, RgbTriangle};

use crate::{
    GlslVersion,
    error::Error,
    gl::{Drawable, RenderContext},
};

/// Which scene to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SceneKind {
    /// Per-vertex colored triangle submitted begin/end style.
    #[default]
    Immediate,
    /// White triangle drawn from a static vertex buffer.
    Buffered,
}

impl SceneKind {
    /// Every scene, in `--help` order.
    pub const ALL: [SceneKind; 2] = [SceneKind::Immediate, SceneKind::Buffered];

    /// Lowercase name accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Buffered => "buffered",
        }
    }

    /// Background the scene is drawn over.
    pub fn clear_color(self) -> [f32; 4] {
        match self {
            Self::Immediate => RgbTriangle::CLEAR_COLOR,
            Self::Buffered => BufferedTriangle::CLEAR_COLOR,
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|k| k.name()).collect();
                format!("unknown scene '{s}', expected one of: {}", names.join(", "))
            })
    }
}

/// A scene with its GPU resources.
#[derive(Debug)]
#[must_use = "call `delete(gl)` before dropping to avoid GPU resource leaks"]
pub enum Scene {
    /// See [`SceneKind::Immediate`].
    Immediate(RgbTriangle),
    /// See [`SceneKind::Buffered`].
    Buffered(BufferedTriangle),
}

impl Scene {
    /// Builds the scene named by `kind`.
    ///
    /// # Errors
    /// Fails if the scene's shaders or buffers cannot be created.
    pub fn create(
        gl: &glow::Context,
        kind: SceneKind,
        glsl_version: GlslVersion,
    ) -> Result<Self, Error> {
        Ok(match kind {
            SceneKind::Immediate => Self::Immediate(RgbTriangle::new(gl, glsl_version)?),
            SceneKind::Buffered => Self::Buffered(BufferedTriangle::new(gl, glsl_version)?),
        })
    }

    /// Which scene this is.
    pub fn kind(&self) -> SceneKind {
        match self {
            Self::Immediate(_) => SceneKind::Immediate,
            Self::Buffered(_) => SceneKind::Buffered,
        }
    }

    /// Releases the scene's GL objects.
    pub fn delete(self, gl: &glow::Context) {
        match self {
            Self::Immediate(scene) => scene.delete(gl),
            Self::Buffered(scene) => scene.delete(gl),
        }
    }

    fn as_drawable(&mut self) -> &mut dyn Drawable {
        match self {
            Self::Immediate(scene) => scene,
            Self::Buffered(scene) => scene,
        }
    }
}

impl Drawable for Scene {
    fn prepare(&mut self, context: &mut RenderContext) -> Result<(), Error> {
        self.as_drawable().prepare(context)
    }

    fn draw(&self, context: &mut RenderContext) {
        match self {
            Self::Immediate(scene) => scene.draw(context),
            Self::Buffered(scene) => scene.draw(context),
        }
    }

    fn cleanup(&mut self, context: &mut RenderContext) {
        self.as_drawable().cleanup(context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_kind_from_str() {
        assert_eq!("immediate".parse::<SceneKind>(), Ok(SceneKind::Immediate));
        assert_eq!(" Buffered ".parse::<SceneKind>(), Ok(SceneKind::Buffered));

        let err = "shaded".parse::<SceneKind>().unwrap_err();
        assert!(err.contains("immediate, buffered"), "{err}");
    }

    #[test]
    fn test_scene_kind_display_round_trips_names() {
        for kind in SceneKind::ALL {
            assert_eq!(kind.to_string().parse::<SceneKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_backgrounds() {
        assert_eq!(SceneKind::default(), SceneKind::Immediate);
        assert_eq!(SceneKind::Immediate.clear_color(), [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(SceneKind::Buffered.clear_color(), [0.0, 0.0, 0.0, 1.0]);
    }
}
