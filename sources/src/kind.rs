//! Decide where data comes from, before anything is loaded.
//!

use std::fmt::{Display, Formatter};

use tracing::trace;

use crate::{flight_id_from_track_artifact, is_flight_ids_artifact, SourceError};

/// The different kinds of source a run can use.
///
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SourceKind {
    /// Live AeroAPI
    Remote,
    /// One saved track file
    SingleTrack { path: String, flight_id: String },
    /// One saved flight-id list file, tracks are next to it
    MultiTrack { path: String },
    /// Anything else
    Unrecognized(String),
}

impl SourceKind {
    /// Classify a user-supplied artifact reference, `None` or empty means the live service.
    ///
    #[tracing::instrument]
    pub fn classify(reference: Option<&str>) -> Self {
        let kind = match reference {
            None | Some("") => SourceKind::Remote,
            Some(path) => match flight_id_from_track_artifact(path) {
                Some(flight_id) => SourceKind::SingleTrack {
                    path: path.to_owned(),
                    flight_id: flight_id.to_owned(),
                },
                None if is_flight_ids_artifact(path) => SourceKind::MultiTrack {
                    path: path.to_owned(),
                },
                None => SourceKind::Unrecognized(path.to_owned()),
            },
        };
        trace!("kind={kind}");
        kind
    }

    /// Refuse an unrecognized reference.
    ///
    pub fn validate(self) -> Result<Self, SourceError> {
        match self {
            SourceKind::Unrecognized(path) => Err(SourceError::Configuration(path)),
            kind => Ok(kind),
        }
    }

    #[inline]
    pub fn is_artifact(&self) -> bool {
        matches!(
            self,
            SourceKind::SingleTrack { .. } | SourceKind::MultiTrack { .. }
        )
    }
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Remote => write!(f, "remote"),
            SourceKind::SingleTrack { path, .. } => write!(f, "single-track({path})"),
            SourceKind::MultiTrack { path } => write!(f, "multi-track({path})"),
            SourceKind::Unrecognized(path) => write!(f, "unrecognized({path})"),
        }
    }
}
