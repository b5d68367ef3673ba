//! Definition of the data formats
//!
//! This crate holds the subset of [FlightAware]'s [AeroAPI] responses we consume (flight lists
//! and position tracks) and the geodesy used to derive extra information from raw positions.
//!
//! [FlightAware]: https://flightaware.com/
//! [AeroAPI]: https://flightaware.com/commercial/aeroapi/
//!

// Re-export for convenience
//
pub use flightaware::*;
pub use geodesy::*;

mod flightaware;
mod geodesy;

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
