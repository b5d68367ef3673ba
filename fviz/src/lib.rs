//! Library part of the `fviz` utility.
//!
//! This has the command-line definitions, the configuration file and the track converter which
//! drives the access methods from `fviz-sources` and the layers from `fviz-render`.
//!
//! Every command is a function in `cmds` returning either what has to be displayed or the list
//! of files generated.
//!

pub use cli::*;
pub use cmds::*;
pub use config::*;
pub use converter::*;
pub use error::*;

mod cli;
mod cmds;
mod config;
mod converter;
mod error;
