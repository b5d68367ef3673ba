//! `FlightApi` is what the rest of the code uses to get flights and tracks.
//!
//! It pairs any `Retriever` with an optional `Archiver`: whenever something is successfully
//! loaded, the raw answer is saved as-is under the archiver's own name for the same request.
//! This is how AeroAPI answers get recorded as snapshots for later replay.
//!

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use fviz_formats::{FlightsResponse, Track};

use crate::{Archiver, Retriever, SourceError};

#[derive(Debug)]
pub struct FlightApi {
    retriever: Box<dyn Retriever>,
    saver: Option<Box<dyn Archiver>>,
}

/// Interpret `[id1,id2]` as an inline list of flight ids.
///
fn inline_flight_ids(reference: &str) -> Option<Vec<String>> {
    let list = reference.strip_prefix('[')?.strip_suffix(']')?;
    Some(
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    )
}

impl FlightApi {
    pub fn new(retriever: Box<dyn Retriever>) -> Self {
        FlightApi {
            retriever,
            saver: None,
        }
    }

    /// Mirror every successful load into `saver`.
    ///
    pub fn with_saver(mut self, saver: Box<dyn Archiver>) -> Self {
        self.saver = Some(saver);
        self
    }

    /// Flight ids for `tail`, most recent first as given by the source.
    ///
    #[tracing::instrument(skip(self))]
    pub fn flight_ids(
        &self,
        tail: &str,
        cutoff: Option<DateTime<Utc>>,
    ) -> Result<Vec<String>, SourceError> {
        let reference = self.retriever.flight_ids_ref(tail, cutoff);
        if let Some(ids) = inline_flight_ids(&reference) {
            trace!("inline list {reference}");
            return Ok(ids);
        }

        let data = self.retriever.load(&reference)?;
        if let Some(saver) = &self.saver {
            saver.save(&saver.flight_ids_ref(tail, cutoff), &data)?;
        }

        let flights = FlightsResponse::from_json(&data)
            .map_err(|source| SourceError::Unmarshal { reference, source })?;
        let ids = flights.flight_ids();
        debug!("{} flight(s) for {tail}", ids.len());
        Ok(ids)
    }

    /// Track of a given flight.
    ///
    #[tracing::instrument(skip(self))]
    pub fn track(&self, flight_id: &str) -> Result<Track, SourceError> {
        let reference = self.retriever.track_ref(flight_id);
        let data = self.retriever.load(&reference)?;
        if let Some(saver) = &self.saver {
            saver.save(&saver.track_ref(flight_id), &data)?;
        }
        parse_track(reference, &data, flight_id)
    }

    /// Track stored at an explicit reference, bypassing the locator.
    ///
    #[tracing::instrument(skip(self))]
    pub fn track_at(&self, reference: &str, flight_id: &str) -> Result<Track, SourceError> {
        let data = self.retriever.load(reference)?;
        parse_track(reference.to_owned(), &data, flight_id)
    }
}

fn parse_track(reference: String, data: &[u8], flight_id: &str) -> Result<Track, SourceError> {
    let track = Track::from_json(data)
        .map_err(|source| SourceError::Unmarshal { reference, source })?
        .with_flight_id(flight_id);
    debug!("{} position(s) for {flight_id}", track.len());
    Ok(track)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use chrono::TimeZone;
    use rstest::rstest;

    use crate::InMemory;

    use super::*;

    const FLIGHTS: &str = r##"{"flights": [{"fa_flight_id": "B"}, {"fa_flight_id": "A"}]}"##;
    const TRACK: &str = r##"{"positions": [{"altitude": 3, "groundspeed": 65, "heading": 270, "latitude": 33.82281, "longitude": -118.1579, "timestamp": "2023-05-10T03:45:35Z"}]}"##;

    fn setup() -> (Rc<InMemory>, FlightApi) {
        let mem = Rc::new(InMemory::new());
        mem.insert("fvf_N123AB.json", FLIGHTS.as_bytes());
        mem.insert("fvt_A.json", TRACK.as_bytes());
        mem.insert("fvt_BAD.json", b"{\"positions\": [");
        let api = FlightApi::new(Box::new(mem.clone()));
        (mem, api)
    }

    #[rstest]
    #[case("[A,B]", Some(vec!["A", "B"]))]
    #[case("[A]", Some(vec!["A"]))]
    #[case("[ A , ]", Some(vec!["A"]))]
    #[case("[]", Some(vec![]))]
    #[case("fvf_X.json", None)]
    #[case("[A", None)]
    fn test_inline_flight_ids(#[case] reference: &str, #[case] res: Option<Vec<&str>>) {
        let res = res.map(|v| v.into_iter().map(String::from).collect::<Vec<_>>());
        assert_eq!(res, inline_flight_ids(reference));
    }

    #[test]
    fn test_flight_ids() {
        let (mem, api) = setup();

        let ids = api.flight_ids("N123AB", None).unwrap();
        assert_eq!(vec!["B", "A"], ids);
        assert_eq!(vec!["fvf_N123AB.json"], mem.loads());
    }

    #[test]
    fn test_flight_ids_missing() {
        let (_mem, api) = setup();

        let cutoff = Utc.with_ymd_and_hms(2023, 5, 11, 23, 27, 29).unwrap();
        let res = api.flight_ids("N123AB", Some(cutoff));
        assert!(matches!(res, Err(SourceError::Retrieval { .. })));
    }

    #[test]
    fn test_track() {
        let (_mem, api) = setup();

        let track = api.track("A").unwrap();
        assert_eq!("A", track.flight_id);
        assert_eq!(1, track.len());
    }

    #[test]
    fn test_track_bad_json() {
        let (_mem, api) = setup();

        let res = api.track("BAD");
        assert!(matches!(res, Err(SourceError::Unmarshal { .. })));
    }

    #[test]
    fn test_track_at() {
        let (mem, api) = setup();

        let track = api.track_at("fvt_A.json", "A").unwrap();
        assert_eq!("A", track.flight_id);
        assert_eq!(vec!["fvt_A.json"], mem.loads());
    }

    #[test]
    fn test_mirror_to_saver() {
        let (_mem, api) = setup();
        let saved = Rc::new(InMemory::new());
        let api = api.with_saver(Box::new(saved.clone()));

        api.flight_ids("N123AB", None).unwrap();
        api.track("A").unwrap();

        assert_eq!(Some(FLIGHTS.as_bytes().to_vec()), saved.get("fvf_N123AB.json"));
        assert_eq!(Some(TRACK.as_bytes().to_vec()), saved.get("fvt_A.json"));
    }

    #[test]
    fn test_failed_load_is_not_mirrored() {
        let (_mem, api) = setup();
        let saved = Rc::new(InMemory::new());
        let api = api.with_saver(Box::new(saved.clone()));

        assert!(api.track("NONE").is_err());
        assert!(saved.get("fvt_NONE.json").is_none());
    }
}
