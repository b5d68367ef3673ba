//! Snapshot access, replaying or recording AeroAPI answers as files.
//!
//! Every answer lives in its own file in an artifacts directory:
//!
//! - `fvf_<tail>[_cutoff-<YYYYMMDDTHHMMSSZ>].json` for a flight-id list
//! - `fvt_<flight id>.json` for a track
//!
//! These names are shared with snapshots recorded by earlier versions so they must not change.
//!

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use fviz_common::{makepath, Options};

use crate::{FileStore, Loader, Locator, Saver, SourceError};

const TRACK_PREFIX: &str = "fvt_";
const TRACK_SUFFIX: &str = ".json";
const FLIGHT_IDS_PREFIX: &str = "fvf_";
const FLIGHT_IDS_SUFFIX: &str = ".json";

/// Cutoff time in file names
const CUTOFF_FMT: &str = "%Y%m%dT%H%M%SZ";

/// File name of a track artifact
///
pub fn track_artifact_name(flight_id: &str) -> String {
    format!("{TRACK_PREFIX}{flight_id}{TRACK_SUFFIX}")
}

/// File name of a flight-id list artifact
///
pub fn flight_ids_artifact_name(tail: &str, cutoff: Option<DateTime<Utc>>) -> String {
    let query = match cutoff {
        Some(cutoff) => format!("{tail}_cutoff-{}", cutoff.format(CUTOFF_FMT)),
        None => tail.to_owned(),
    };
    format!("{FLIGHT_IDS_PREFIX}{query}{FLIGHT_IDS_SUFFIX}")
}

fn base_name(reference: &str) -> Option<&str> {
    Path::new(reference).file_name().and_then(|s| s.to_str())
}

/// Extract the flight id from a track artifact name, directories are ignored.
///
pub fn flight_id_from_track_artifact(reference: &str) -> Option<&str> {
    base_name(reference)?
        .strip_prefix(TRACK_PREFIX)?
        .strip_suffix(TRACK_SUFFIX)
}

/// Does `reference` name a track artifact?
///
pub fn is_track_artifact(reference: &str) -> bool {
    flight_id_from_track_artifact(reference).is_some()
}

/// Does `reference` name a flight-id list artifact?
///
pub fn is_flight_ids_artifact(reference: &str) -> bool {
    base_name(reference)
        .and_then(|s| s.strip_prefix(FLIGHT_IDS_PREFIX))
        .and_then(|s| s.strip_suffix(FLIGHT_IDS_SUFFIX))
        .is_some()
}

/// A directory given as "" or "." means "not specified".
///
fn dir_of(path: &Path) -> Option<&Path> {
    path.parent()
        .filter(|d| !d.as_os_str().is_empty() && *d != Path::new("."))
}

/// Files in an artifacts directory.
///
/// When driven by a specific flight-id list file, tracks are searched next to that file.
///
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Where artifacts go when nothing else is said
    artifacts_dir: PathBuf,
    /// Specific flight-id list (or track) file
    flight_ids_file: Option<PathBuf>,
    store: FileStore,
    opts: Options,
}

impl Snapshot {
    #[tracing::instrument]
    pub fn new(artifacts_dir: &str, opts: Options) -> Self {
        Snapshot {
            artifacts_dir: PathBuf::from(artifacts_dir),
            flight_ids_file: None,
            store: FileStore,
            opts,
        }
    }

    /// Use this file instead of the computed flight-id list name.
    ///
    pub fn with_flight_ids_file(mut self, fname: &str) -> Self {
        self.flight_ids_file = Some(PathBuf::from(fname));
        self
    }

    /// Bare file names are resolved against the artifacts directory.
    ///
    fn resolve(&self, fname: &Path) -> PathBuf {
        match dir_of(fname) {
            Some(_) => fname.to_path_buf(),
            None => makepath!(
                &self.artifacts_dir,
                fname.file_name().unwrap_or(fname.as_os_str())
            ),
        }
    }
}

impl Locator for Snapshot {
    fn flight_ids_ref(&self, tail: &str, cutoff: Option<DateTime<Utc>>) -> String {
        let fname = match &self.flight_ids_file {
            Some(fname) => {
                // A saved track used as the source, it is its own flight-id list
                //
                if let Some(id) = fname.to_str().and_then(flight_id_from_track_artifact) {
                    return format!("[{id}]");
                }
                fname.clone()
            }
            None => PathBuf::from(flight_ids_artifact_name(tail, cutoff)),
        };
        self.resolve(&fname).to_string_lossy().into_owned()
    }

    fn track_ref(&self, flight_id: &str) -> String {
        let dir = self
            .flight_ids_file
            .as_deref()
            .and_then(dir_of)
            .unwrap_or(self.artifacts_dir.as_path());
        let fname: PathBuf = makepath!(dir, track_artifact_name(flight_id));
        fname.to_string_lossy().into_owned()
    }
}

impl Loader for Snapshot {
    fn load(&self, reference: &str) -> Result<Vec<u8>, SourceError> {
        if self.opts.verbose {
            info!("reading from file({reference})");
        } else {
            debug!("reading from file({reference})");
        }
        self.store.load(reference)
    }
}

impl Saver for Snapshot {
    fn save(&self, reference: &str, data: &[u8]) -> Result<(), SourceError> {
        if self.opts.verbose {
            info!("saving to file({reference})");
        } else {
            debug!("saving to file({reference})");
        }
        self.store.save(reference, data)
    }
}
