//! Module to deal with the different places flight artifacts come from and go to.
//!
//! An artifact is either a flight-id list for a tail number or the track of one flight.  Every
//! access method knows how to name them (`Locator`) and then either how to get them (`Loader`)
//! or how to keep them (`Saver`):
//!
//! - `AeroApi` names REST endpoints and loads them over HTTP
//! - `Snapshot` names files in an artifacts directory and reads/writes them
//! - `InMemory` keeps everything in a map, mostly for replaying canned answers
//!
//! `FlightApi` glues one retriever with an optional archiver so that every successful load can
//! be mirrored somewhere else.
//!

use std::fmt::Debug;
use std::rc::Rc;

use chrono::{DateTime, Utc};

// Re-export these modules for a shorted import path.
//
pub use access::*;
pub use api::*;
pub use error::*;
pub use kind::*;

mod access;
mod api;
mod error;
mod kind;

#[macro_use]
mod macros;

/// Name the artifacts of a given access method.
///
pub trait Locator: Debug {
    /// Reference to the list of flights for `tail`, only those before `cutoff` if given.
    ///
    /// A reference enclosed in square brackets is an inline comma-separated list of flight ids
    /// and must not be loaded.
    ///
    fn flight_ids_ref(&self, tail: &str, cutoff: Option<DateTime<Utc>>) -> String;
    /// Reference to the track of one flight.
    fn track_ref(&self, flight_id: &str) -> String;
}

/// Get the raw content behind a reference.
///
pub trait Loader: Debug {
    fn load(&self, reference: &str) -> Result<Vec<u8>, SourceError>;
}

/// Keep raw content under a reference.
///
pub trait Saver: Debug {
    fn save(&self, reference: &str, data: &[u8]) -> Result<(), SourceError>;
}

// A shared access method is still an access method
//
impl<T: Locator + ?Sized> Locator for Rc<T> {
    fn flight_ids_ref(&self, tail: &str, cutoff: Option<DateTime<Utc>>) -> String {
        (**self).flight_ids_ref(tail, cutoff)
    }

    fn track_ref(&self, flight_id: &str) -> String {
        (**self).track_ref(flight_id)
    }
}

impl<T: Loader + ?Sized> Loader for Rc<T> {
    fn load(&self, reference: &str) -> Result<Vec<u8>, SourceError> {
        (**self).load(reference)
    }
}

impl<T: Saver + ?Sized> Saver for Rc<T> {
    fn save(&self, reference: &str, data: &[u8]) -> Result<(), SourceError> {
        (**self).save(reference, data)
    }
}

/// Anything we can read artifacts from.
///
pub trait Retriever: Locator + Loader {}

impl<T: Locator + Loader> Retriever for T {}

/// Anything we can mirror artifacts into.
///
pub trait Archiver: Locator + Saver {}

impl<T: Locator + Saver> Archiver for T {}

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
