//! Module describing all possible commands and sub-commands to the `fviz` main driver
//!
//! We have one main command:
//!
//! - `tracks`
//!
//! `tracks` fetches the recent flights of an aircraft from [AeroAPI], or replays them from
//! snapshots saved earlier, and writes one KMZ file per flight with the selected layers.
//!
//! `list layers` shows the available layers, `completion` is here just to configure the various
//! shells completion system.
//!
//! [AeroAPI]: https://www.flightaware.com/aeroapi/portal/documentation
//!

use chrono::{DateTime, Utc};
use clap::{crate_authors, crate_description, crate_name, crate_version, Parser, ValueEnum};
use clap_complete::shells::Shell;

use crate::FailurePolicy;

/// Layers used when none are given
pub const DEF_LAYERS: &str = "camera,path,vector";

/// CLI options
#[derive(Parser)]
#[command(disable_version_flag = true)]
#[clap(name = crate_name!(), about = crate_description!())]
#[clap(version = crate_version!(), author = crate_authors!())]
pub struct Opts {
    /// configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<String>,
    /// debug mode.
    #[clap(short = 'D', long = "debug")]
    pub debug: bool,
    /// Verbose mode.
    #[clap(short = 'v', long)]
    pub verbose: bool,
    /// Use hierarchical logging output.
    #[clap(long)]
    pub tree: bool,
    /// Also log into files in this directory.
    #[clap(long)]
    pub log_dir: Option<String>,
    /// Sub-commands (see below).
    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

// ------

/// All sub-commands:
///
/// `completion SHELL`
/// `list layers`
/// `tracks [-n tail] [-f artifact] [-c count] [-l layers] ...`
/// `version`
///
#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Generate Completion stuff
    Completion(ComplOpts),
    /// List information
    List(ListOpts),
    /// Generate KMZ files from flight tracks
    Tracks(TracksOpts),
    /// List all package versions
    Version,
}

// ------

/// Options for generating tracks.
///
#[derive(Debug, Parser)]
pub struct TracksOpts {
    /// Tail number of the aircraft
    #[clap(short = 'n', long)]
    pub tail_number: Option<String>,
    /// Saved track or flight-id list to use instead of AeroAPI
    #[clap(short = 'f', long)]
    pub from_artifact: Option<String>,
    /// Directory for saved artifacts and generated files
    #[clap(short = 'a', long)]
    pub artifacts_dir: Option<String>,
    /// Do not roll the camera with the turns
    #[clap(short = 'b', long)]
    pub no_banking: bool,
    /// Only this many of the most recent flights
    #[clap(short = 'c', long)]
    pub flight_count: Option<usize>,
    /// Comma-separated list of layers
    #[clap(short = 'l', long, default_value = DEF_LAYERS)]
    pub layers: String,
    /// Save AeroAPI answers as artifacts
    #[clap(short = 's', long)]
    pub save_artifacts: bool,
    /// Only flights before this time (RFC3339)
    #[clap(short = 't', long)]
    pub cutoff: Option<DateTime<Utc>>,
    /// What to do when some flights fail
    #[clap(long, value_enum)]
    pub on_error: Option<FailurePolicy>,
}

// ------

/// Options to generate completion files at runtime
///
#[derive(Debug, Parser)]
pub struct ComplOpts {
    #[clap(value_parser)]
    pub shell: Shell,
}

// ------

/// All `list` sub-commands:
///
/// `list layers`
///
#[derive(Debug, Parser)]
pub struct ListOpts {
    #[clap(value_parser)]
    pub cmd: ListSubCommand,
}

/// These are the sub-commands for `list`
///
#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, ValueEnum)]
pub enum ListSubCommand {
    /// List all layers and what they show
    Layers,
}
