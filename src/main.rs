//! Wooting Keyboard Driver CLI
//!
//! A command-line interface for Wooting RGB lighting and analog input.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{Cli, Commands};

mod commands;

use wooting_driver::DriverConfig;
use wooting_keyboard::MatrixPosition;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(DriverConfig::default_path);
    let config = DriverConfig::load(&config_path)?;

    // Initialize logging
    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    info!("Loaded config from {:?}", config_path);

    let command = cli.command.unwrap_or(Commands::List { json: false });
    if let Commands::Config { write } = command {
        return commands::utility::show_config(&config, &config_path, write);
    }

    let want_analog = cli.analog || matches!(command, Commands::Analog);
    let options = config.device_options(want_analog, cli.no_rgb);

    let mut devices = commands::connect(options).await?;

    let result = match command {
        Commands::List { json } => commands::utility::list(&devices, json),
        Commands::Demo => commands::rgb::demo(&mut devices, &config.demo).await,
        Commands::Single {
            row,
            column,
            colour,
        } => {
            let hold = Duration::from_millis(config.demo.hold_ms);
            commands::rgb::single(&mut devices, MatrixPosition::new(row, column), colour, hold)
                .await
        }
        Commands::Fill { colour } => commands::rgb::fill(&mut devices, colour).await,
        Commands::Reset => commands::rgb::reset(&devices).await,
        Commands::Analog => commands::analog::monitor(&devices).await,
        Commands::Config { .. } => Ok(()),
    };

    devices.close_all().await;
    result
}
