//! Command-line interface implementation
//!
//! This module provides the CLI definition and dispatches to submodules
//! for specific command implementations.

#[cfg(feature = "live")]
mod live;
mod palettes;
mod render;
mod sheet;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, CrosswalkConfig};
use crate::models::Archetype;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Crosswalk - procedural pixel-art walkers paced by live payment statistics
#[derive(Parser)]
#[command(name = "xwalk")]
#[command(about = "Crosswalk - procedural pixel-art walkers paced by live payment statistics")]
#[command(version)]
pub struct Cli {
    /// Path to crosswalk.toml (default: discovered from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Canvas size flags shared by commands that render lanes
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ViewportArgs {
    /// Canvas width in CSS pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in CSS pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Device pixel ratio of the backing buffer
    #[arg(long)]
    pub dpr: Option<f64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the built-in palettes and their role colors
    Palettes {
        /// Only list palettes for this archetype
        #[arg(long, value_enum)]
        archetype: Option<Archetype>,
    },

    /// Export a sprite sheet (6 frames) as a PNG strip
    Sheet {
        /// Character archetype
        #[arg(long, value_enum)]
        archetype: Archetype,

        /// Palette index (wraps around the archetype's palette table)
        #[arg(long, default_value = "0")]
        palette: usize,

        /// Output file (default: {archetype}_{palette}.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale output by integer factor (1-32)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=32))]
        scale: u8,

        /// Frames per row (default: all frames in one row)
        #[arg(long)]
        cols: Option<u32>,
    },

    /// Simulate one lane headless; write a GIF (.gif) or the final frame (PNG)
    Render {
        /// Lane archetype
        #[arg(long, value_enum)]
        archetype: Archetype,

        /// Output file; `.gif` writes the animation
        #[arg(short, long)]
        output: PathBuf,

        /// Number of frames to simulate
        #[arg(long, default_value = "60", value_parser = clap::value_parser!(u32).range(1..=100_000))]
        frames: u32,

        /// Frames per second of simulated time
        #[arg(long, default_value = "30")]
        fps: f64,

        /// Arrival rate in walkers per second (default: the lane's configured initial rate)
        #[arg(long)]
        rate: Option<f64>,

        /// Random seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        viewport: ViewportArgs,
    },

    /// Fetch live statistics once and print the dashboard
    #[cfg(feature = "live")]
    Stats {
        /// Also list the N busiest facilitators
        #[arg(long)]
        facilitators: Option<u32>,

        /// Override the statistics endpoint
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Run both lanes headless while polling live statistics
    #[cfg(feature = "live")]
    Watch {
        /// Seconds to run before exiting (Ctrl-C stops early)
        #[arg(long, default_value = "10")]
        duration: f64,

        /// Frames per second
        #[arg(long, default_value = "60")]
        fps: f64,

        /// Save the final frame of each lane into this directory
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Override the statistics endpoint
        #[arg(long)]
        base_url: Option<String>,

        /// Override the polling interval in seconds
        #[arg(long)]
        poll_interval: Option<u64>,

        #[command(flatten)]
        viewport: ViewportArgs,
    },
}

/// Load config and apply CLI overrides, printing any error.
pub(crate) fn load_settings(path: Option<&Path>, overrides: &CliOverrides) -> Result<CrosswalkConfig, ExitCode> {
    load_config(path).and_then(|config| merge_cli_overrides(config, overrides)).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })
}

impl ViewportArgs {
    pub(crate) fn overrides(&self) -> CliOverrides {
        CliOverrides { width: self.width, height: self.height, device_pixel_ratio: self.dpr, ..Default::default() }
    }
}

/// Reject a frame rate that is zero, negative or not a number.
pub(crate) fn check_fps(fps: f64) -> Result<f64, ExitCode> {
    if fps.is_finite() && fps > 0.0 {
        Ok(fps)
    } else {
        eprintln!("Error: --fps must be a positive number, got {}", fps);
        Err(ExitCode::from(EXIT_INVALID_ARGS))
    }
}

/// Execute a parsed command line.
pub fn run(cli: Cli) -> ExitCode {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Palettes { archetype } => palettes::run_palettes(archetype),
        Commands::Sheet { archetype, palette, output, scale, cols } => {
            sheet::run_sheet(archetype, palette, output.as_deref(), scale, cols)
        }
        Commands::Render { archetype, output, frames, fps, rate, seed, viewport } => {
            let config = match load_settings(config_path, &viewport.overrides()) {
                Ok(config) => config,
                Err(code) => return code,
            };
            render::run_render(&config, archetype, &output, frames, fps, rate, seed)
        }
        #[cfg(feature = "live")]
        Commands::Stats { facilitators, base_url } => {
            let overrides = CliOverrides { base_url, ..Default::default() };
            let config = match load_settings(config_path, &overrides) {
                Ok(config) => config,
                Err(code) => return code,
            };
            live::run_stats(&config, facilitators)
        }
        #[cfg(feature = "live")]
        Commands::Watch { duration, fps, snapshot, base_url, poll_interval, viewport } => {
            let overrides = CliOverrides { base_url, poll_interval_secs: poll_interval, ..viewport.overrides() };
            let config = match load_settings(config_path, &overrides) {
                Ok(config) => config,
                Err(code) => return code,
            };
            live::run_watch(&config, duration, fps, snapshot.as_deref())
        }
    }
}
