// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wooting_keyboard::Rgb;

#[derive(Parser)]
#[command(name = "wooting_driver")]
#[command(author, version, about = "Wooting RGB and analog keyboard driver")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (default: ~/.config/wooting/driver.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); overrides the config file
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also claim analog input interfaces
    #[arg(long, global = true)]
    pub analog: bool,

    /// Do not claim RGB interfaces
    #[arg(long, global = true)]
    pub no_rgb: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List connected devices and their capability
    #[command(visible_alias = "ls")]
    List {
        /// Print HID descriptors as JSON
        #[arg(long)]
        json: bool,
    },

    /// Colour every row, then every column, then reset
    Demo,

    /// Set one key directly, hold, then reset
    Single {
        /// Matrix row (0-based)
        #[arg(short, long)]
        row: u8,
        /// Matrix column (0-based)
        #[arg(short = 'C', long)]
        column: u8,
        /// Colour as #RRGGBB
        #[arg(long)]
        colour: Rgb,
    },

    /// Paint every key with one colour
    Fill {
        /// Colour as #RRGGBB
        #[arg(long)]
        colour: Rgb,
    },

    /// Hand lighting back to the keyboard
    #[command(visible_alias = "r")]
    Reset,

    /// Print analog key travel until Ctrl-C
    #[command(visible_alias = "a")]
    Analog,

    /// Show the effective configuration as TOML
    Config {
        /// Also write it to the config file path
        #[arg(long)]
        write: bool,
    },
}
