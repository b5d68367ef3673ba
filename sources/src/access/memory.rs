//! In-memory artifacts.
//!
//! Uses the same names as `Snapshot` without any directory.  Every `load()` is recorded so one
//! can check afterwards what was asked for and in which order.
//!

use std::cell::RefCell;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::{
    flight_ids_artifact_name, track_artifact_name, Loader, Locator, Saver, SourceError,
};

#[derive(Debug, Default)]
pub struct InMemory {
    store: RefCell<BTreeMap<String, Vec<u8>>>,
    loads: RefCell<Vec<String>>,
}

impl InMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register content under a reference
    ///
    pub fn insert(&self, reference: &str, data: &[u8]) {
        self.store
            .borrow_mut()
            .insert(reference.to_owned(), data.to_vec());
    }

    /// Content currently stored under a reference
    ///
    pub fn get(&self, reference: &str) -> Option<Vec<u8>> {
        self.store.borrow().get(reference).cloned()
    }

    /// References loaded so far, in order
    ///
    pub fn loads(&self) -> Vec<String> {
        self.loads.borrow().clone()
    }
}

impl Locator for InMemory {
    fn flight_ids_ref(&self, tail: &str, cutoff: Option<DateTime<Utc>>) -> String {
        flight_ids_artifact_name(tail, cutoff)
    }

    fn track_ref(&self, flight_id: &str) -> String {
        track_artifact_name(flight_id)
    }
}

impl Loader for InMemory {
    fn load(&self, reference: &str) -> Result<Vec<u8>, SourceError> {
        trace!("memory::load({reference})");

        self.loads.borrow_mut().push(reference.to_owned());
        self.get(reference).ok_or_else(|| SourceError::Retrieval {
            reference: reference.to_owned(),
            source: format!("nothing stored under {reference}").into(),
        })
    }
}

impl Saver for InMemory {
    fn save(&self, reference: &str, data: &[u8]) -> Result<(), SourceError> {
        trace!("memory::save({reference})");

        self.insert(reference, data);
        Ok(())
    }
}
