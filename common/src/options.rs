//! Run-wide options.
//!
//! These are decided once from the command-line and the configuration file, then handed to
//! every component needing them when it is built.
//!

/// Behaviour switches shared by the sources and the renderers.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Options {
    /// Report every request and every failure instead of a summary
    pub verbose: bool,
    /// Trace intermediate computations (bank angle, etc.)
    pub debug: bool,
    /// Roll the camera with the estimated bank angle
    pub banking: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            verbose: false,
            debug: false,
            banking: true,
        }
    }
}

impl Options {
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn banking(mut self, banking: bool) -> Self {
        self.banking = banking;
        self
    }
}
