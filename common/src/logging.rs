//! Common logging initializer
//!

use eyre::Result;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use tracing_tree::HierarchicalLayer;

/// Level used when `RUST_LOG` is not set, `debug` wins over `verbose`.
///
pub fn default_level(verbose: bool, debug: bool) -> LevelFilter {
    match (verbose, debug) {
        (_, true) => LevelFilter::DEBUG,
        (true, false) => LevelFilter::INFO,
        (false, false) => LevelFilter::WARN,
    }
}

/// Set up the global subscriber.
///
/// Filters are taken from `RUST_LOG`, defaulting to [default_level].  The hierarchical output
/// replaces the compact one when `use_tree` is set, and `use_file` adds an hourly rolling log in
/// that directory.
///
pub fn init_logging(
    name: &'static str,
    verbose: bool,
    debug: bool,
    use_tree: bool,
    use_file: Option<String>,
) -> Result<()> {
    // Load filters from environment
    //
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose, debug).into())
        .from_env_lossy();

    // Do we want hierarchical output?
    //
    let tree = if use_tree {
        Some(
            HierarchicalLayer::new(2)
                .with_ansi(true)
                .with_span_retrace(true)
                .with_span_modes(true)
                .with_targets(true)
                .with_verbose_entry(true)
                .with_verbose_exit(true)
                .with_bracketed_fields(true),
        )
    } else {
        None
    };

    // Plain output otherwise
    //
    let compact = if use_tree {
        None
    } else {
        Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
    };

    // Log to file?
    //
    let file = use_file.map(|dir| {
        // Basic append-only rolling file for all traces.
        //
        let file_appender = tracing_appender::rolling::hourly(dir, name);
        fmt::layer().with_ansi(false).with_writer(file_appender)
    });

    // Combine filters & exporters
    //
    tracing_subscriber::registry()
        .with(filter)
        .with(tree)
        .with(compact)
        .with(file)
        .try_init()?;

    Ok(())
}
