use clap::Parser;
use tracing::Level;
use trigl_core::SceneKind;

use crate::window::WindowConfig;

#[derive(Parser, Debug)]
#[command(
    name = "trigl",
    version,
    about = "Opens a window and draws a single RGB triangle",
    long_about = "Opens a fixed-size window and draws one triangle with blue, green and red \
                  corners on a gray background until the window is closed"
)]
pub struct Cli {
    /// Window title
    #[arg(long, default_value = "OpenGL Window")]
    pub title: String,

    /// Window width in logical pixels
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Initial window position as X,Y (e.g. 100,50)
    #[arg(long, value_name = "X,Y", value_parser = parse_position)]
    pub position: Option<(i32, i32)>,

    /// What to draw
    #[arg(long, default_value_t = SceneKind::Immediate, value_name = "SCENE")]
    pub scene: SceneKind,

    /// Present frames as fast as possible instead of waiting for vblank
    #[arg(long)]
    pub no_vsync: bool,

    /// Console log level (overrides TRIGL_LOG_LEVEL)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<Level>,
}

impl Cli {
    pub fn window_config(&self) -> WindowConfig {
        WindowConfig {
            title: self.title.clone(),
            size: (self.width, self.height),
            position: self.position,
            vsync: !self.no_vsync,
        }
    }
}

fn parse_position(s: &str) -> Result<(i32, i32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;

    let coord = |v: &str| {
        v.trim()
            .parse::<i32>()
            .map_err(|e| format!("invalid coordinate '{v}': {e}"))
    };

    Ok((coord(x)?, coord(y)?))
}
