//! Plain file access.
//!
//! References are file paths, used as-is.
//!

use std::fs;
use std::path::Path;

use tracing::trace;

use crate::{Loader, Saver, SourceError};

/// Read and write whole files.
///
#[derive(Clone, Copy, Debug, Default)]
pub struct FileStore;

impl Loader for FileStore {
    #[tracing::instrument]
    fn load(&self, reference: &str) -> Result<Vec<u8>, SourceError> {
        fs::read(reference).map_err(|e| SourceError::Retrieval {
            reference: reference.to_owned(),
            source: Box::new(e),
        })
    }
}

impl Saver for FileStore {
    /// Missing parent directories are created.
    ///
    #[tracing::instrument(skip(data))]
    fn save(&self, reference: &str, data: &[u8]) -> Result<(), SourceError> {
        let wrap = |e| SourceError::Save {
            reference: reference.to_owned(),
            source: e,
        };

        if let Some(dir) = Path::new(reference).parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                trace!("creating {dir:?}");
                fs::create_dir_all(dir).map_err(wrap)?;
            }
        }
        fs::write(reference, data).map_err(wrap)
    }
}
