//! Error module
//!

use std::fmt::{Display, Formatter};

use thiserror::Error;

use fviz_render::{PackagingError, RenderError};
use fviz_sources::SourceError;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Packaging(#[from] PackagingError),
    #[error("no visualization could be generated for {tail}, {} error(s) encountered", .failures.len())]
    NoTracks { tail: String, failures: Vec<Failure> },
}

/// One flight of a batch that could not be converted.
///
#[derive(Debug)]
pub struct Failure {
    pub flight_id: String,
    pub error: ConvertError,
}

impl Failure {
    pub fn new(flight_id: &str, error: impl Into<ConvertError>) -> Self {
        Failure {
            flight_id: flight_id.to_owned(),
            error: error.into(),
        }
    }
}

impl Display for Failure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.flight_id, self.error)
    }
}
