use std::io;

use clap::{crate_authors, crate_description, crate_version, CommandFactory, Parser};
use clap_complete::generate;
use eyre::Result;
use tracing::{info, trace};

use fviz::{generate_tracks, list_layers, Config, ListSubCommand, Opts, SubCommand};
use fviz_common::{init_logging, Options};

/// Binary name, using a different binary name
pub const NAME: &str = env!("CARGO_BIN_NAME");
/// Binary version
pub const VERSION: &str = crate_version!();
/// Authors
pub const AUTHORS: &str = crate_authors!();

fn main() -> Result<()> {
    let opts = Opts::parse();

    // Initialise logging.
    //
    init_logging(
        NAME,
        opts.verbose,
        opts.debug,
        opts.tree,
        opts.log_dir.clone(),
    )?;

    // Banner
    //
    banner()?;

    // Config has the AeroAPI parameters and defaults for the options.
    //
    let cfg = Config::load(opts.config.as_deref())?;

    handle_subcmd(&opts, &cfg)
}

pub fn handle_subcmd(opts: &Opts, cfg: &Config) -> Result<()> {
    match &opts.subcmd {
        // Handle `tracks`
        //
        SubCommand::Tracks(topts) => {
            trace!("tracks");

            let run = Options::default()
                .verbose(opts.verbose || cfg.verbose)
                .debug(opts.debug);
            let files = generate_tracks(cfg, run, topts)?;

            // Paths on stdout for whatever opens them next
            //
            files.iter().for_each(|f| println!("{}", f.display()));
        }

        // Standalone completion generation
        //
        // NOTE: you can generate UNIX shells completion on Windows and vice-versa.  Not worth
        //       trying to limit depending on the OS.
        //
        SubCommand::Completion(copts) => {
            let generator = copts.shell;
            generate(generator, &mut Opts::command(), NAME, &mut io::stdout());
        }

        // Standalone `list` command
        //
        SubCommand::List(lopts) => match lopts.cmd {
            ListSubCommand::Layers => {
                info!("Listing all layers:");

                let str = list_layers()?;
                eprintln!("{}", str);
            }
        },

        // Standalone `version` command
        //
        SubCommand::Version => {
            eprintln!("Modules: ");
            eprintln!("\t{}", version());
            eprintln!("\t{}", fviz_common::version());
            eprintln!("\t{}", fviz_formats::version());
            eprintln!("\t{}", fviz_sources::version());
            eprintln!("\t{}", fviz_render::version());
        }
    }
    Ok(())
}

/// Return our version number
///
#[inline]
pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}

/// Display banner
///
fn banner() -> Result<()> {
    Ok(eprintln!(
        r##"
{}/{} by {}
{}
"##,
        NAME,
        VERSION,
        AUTHORS,
        crate_description!()
    ))
}
