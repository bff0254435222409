//! Command-line argument definitions for the Slocum processor
//!
//! Defines the CLI interface using the clap derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the Slocum glider data processor
///
/// Derives standardized science variables (position, depth, salinity,
/// density, oxygen, depth-averaged velocity) from directories of Slocum
/// dba telemetry segment files.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "slocum-processor",
    version,
    about = "Derive standardized science variables from Slocum glider dba segment files",
    long_about = "Processes complete, already-downloaded Slocum glider dba segment files in \
                  ascending mission/segment order, deriving interpolated positions, depth, \
                  practical salinity, density, compensated oxygen and depth-averaged water \
                  velocity with full provenance attributes."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Process a directory of dba segment files (main command)
    Process(ProcessArgs),
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Input directory containing converted dba segment files
    ///
    /// Searched recursively; files are ordered by the mission/segment code
    /// in their headers before processing.
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input_path: PathBuf,

    /// Output file for JSON-lines segment summaries
    ///
    /// One JSON object per processed segment, carrying the resolved
    /// velocity, segment time/position and per-file diagnostics. Written to
    /// stdout when omitted.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output_path: Option<PathBuf>,

    /// Path to a JSON configuration file
    ///
    /// Overrides the built-in sensor priority lists, required sensor sets
    /// and thresholds. Absent fields keep their defaults.
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config_path: Option<PathBuf>,

    /// Explicit time sensor to prefer over the priority list
    #[arg(long = "time-sensor", value_name = "SENSOR")]
    pub time_sensor: Option<String>,

    /// Explicit pressure sensor to prefer over the priority list
    #[arg(long = "pressure-sensor", value_name = "SENSOR")]
    pub pressure_sensor: Option<String>,

    /// Explicit depth sensor to prefer over the priority list
    #[arg(long = "depth-sensor", value_name = "SENSOR")]
    pub depth_sensor: Option<String>,

    /// Alias the chosen depth sensor instead of recomputing depth from
    /// pressure and latitude
    #[arg(long = "no-z-from-p")]
    pub no_z_from_p: bool,

    /// Process files that fail the goodness checks instead of skipping them
    #[arg(long = "keep-bad-files")]
    pub keep_bad_files: bool,

    /// Hide the progress bar
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}
