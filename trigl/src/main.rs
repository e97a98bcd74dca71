mod app;
mod cli;
mod logging;
mod window;

use clap::Parser;
use color_eyre::eyre::{Context, Result};

use crate::{
    cli::Cli,
    logging::{LoggingConfig, init_logging},
};

fn main() -> Result<()> {
    // panic hook
    color_eyre::install()?;

    // parse command line arguments
    let cli = Cli::parse();

    let logging_config = LoggingConfig::from_env().with_console_level(cli.log_level);
    let _guard = init_logging(&logging_config).wrap_err("Failed to initialize logging")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        scene = %cli.scene,
        "trigl starting up"
    );

    app::run(cli.window_config(), cli.scene)?;

    tracing::info!("window closed, exiting");
    Ok(())
}
