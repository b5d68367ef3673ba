//! FlightAware AeroAPI access
//!
//! AeroAPI is a plain REST API: every request is a `GET` on `<base_url>/<endpoint>` carrying
//! the API key in the `x-apikey` header.  We only use two endpoints:
//!
//! - `flights/{ident}` to get the list of recent flights of an aircraft
//! - `flights/{id}/track` to get the positions of one flight
//!
//! This implements `Locator` and `Loader`.
//!

use chrono::{DateTime, SecondsFormat, Utc};
use clap::{crate_name, crate_version};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::blocking::Client;
use tracing::{debug, info, trace};

use fviz_common::Options;

use crate::{http_get_key, Loader, Locator, SourceError};

/// Default AeroAPI base URL
pub const DEF_API_URL: &str = "https://aeroapi.flightaware.com/aeroapi";

/// Characters escaped in one path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const PATH_SEP: char = '/';

/// AeroApi represent what is needed to fetch data from FlightAware.
///
#[derive(Clone, Debug)]
pub struct AeroApi {
    /// Base site url taken from config
    pub base_url: String,
    /// API key sent along every request
    api_key: String,
    /// Run options
    opts: Options,
    /// reqwest blocking client
    client: Client,
}

impl AeroApi {
    #[tracing::instrument(skip(api_key))]
    pub fn new(base_url: &str, api_key: &str, opts: Options) -> Self {
        trace!("aeroapi::new");

        AeroApi {
            base_url: base_url.to_owned(),
            api_key: api_key.to_owned(),
            opts,
            client: Client::new(),
        }
    }

    /// Full request URL for an endpoint
    ///
    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url.trim_end_matches(PATH_SEP),
            PATH_SEP,
            endpoint.trim_start_matches(PATH_SEP)
        )
    }
}

#[inline]
fn segment(s: &str) -> String {
    utf8_percent_encode(s, SEGMENT).to_string()
}

impl Locator for AeroApi {
    fn flight_ids_ref(&self, tail: &str, cutoff: Option<DateTime<Utc>>) -> String {
        let endpoint = format!("flights/{}", segment(tail));
        match cutoff {
            Some(cutoff) => format!(
                "{endpoint}?end={}",
                cutoff.to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
            None => endpoint,
        }
    }

    fn track_ref(&self, flight_id: &str) -> String {
        format!("flights/{}/track", segment(flight_id))
    }
}

impl Loader for AeroApi {
    #[tracing::instrument(skip(self))]
    fn load(&self, reference: &str) -> Result<Vec<u8>, SourceError> {
        if self.opts.verbose {
            info!("requesting from endpoint({reference})");
        }
        let url = self.url(reference);
        debug!("url={url}");

        let resp = http_get_key!(self, url).map_err(|e| SourceError::Retrieval {
            reference: reference.to_owned(),
            source: Box::new(e),
        })?;

        // Check status
        //
        let status = resp.status();
        if !status.is_success() {
            trace!("error resp={:?}", resp);
            let body = resp.text().unwrap_or_default();
            return Err(SourceError::Status {
                reference: reference.to_owned(),
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().map_err(|e| SourceError::Retrieval {
            reference: reference.to_owned(),
            source: Box::new(e),
        })?;
        trace!("got {} bytes", body.len());
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use httpmock::prelude::*;
    use rstest::rstest;

    use super::*;

    const FLIGHTS: &str = r##"{"flights": [{"fa_flight_id": "N123AB-1"}]}"##;

    fn setup_aeroapi(server: &MockServer) -> AeroApi {
        AeroApi::new(&server.base_url(), "SECRET", Options::default())
    }

    #[rstest]
    #[case("N123AB", None, "flights/N123AB")]
    #[case("N 12/3", None, "flights/N%2012%2F3")]
    #[case(
        "N123AB",
        Some(Utc.with_ymd_and_hms(2023, 5, 11, 23, 27, 29).unwrap()),
        "flights/N123AB?end=2023-05-11T23:27:29Z"
    )]
    fn test_flight_ids_ref(
        #[case] tail: &str,
        #[case] cutoff: Option<DateTime<Utc>>,
        #[case] res: &str,
    ) {
        let api = AeroApi::new(DEF_API_URL, "", Options::default());
        assert_eq!(res, api.flight_ids_ref(tail, cutoff));
    }

    #[rstest]
    #[case("N123AB-1683676800-adhoc-0", "flights/N123AB-1683676800-adhoc-0/track")]
    #[case("a b", "flights/a%20b/track")]
    fn test_track_ref(#[case] id: &str, #[case] res: &str) {
        let api = AeroApi::new(DEF_API_URL, "", Options::default());
        assert_eq!(res, api.track_ref(id));
    }

    #[rstest]
    #[case("https://example.net/api", "flights/X", "https://example.net/api/flights/X")]
    #[case("https://example.net/api/", "/flights/X", "https://example.net/api/flights/X")]
    #[case("https://example.net/api//", "flights/X", "https://example.net/api/flights/X")]
    fn test_url(#[case] base: &str, #[case] endpoint: &str, #[case] res: &str) {
        let api = AeroApi::new(base, "", Options::default());
        assert_eq!(res, api.url(endpoint));
    }

    #[test]
    fn test_load_flights() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/flights/N123AB")
                .header("x-apikey", "SECRET")
                .header("accept", "application/json");
            then.status(200).body(FLIGHTS);
        });

        let api = setup_aeroapi(&server);
        let reference = api.flight_ids_ref("N123AB", None);
        let data = api.load(&reference);
        m.assert();
        assert!(data.is_ok());
        assert_eq!(FLIGHTS.as_bytes(), data.unwrap().as_slice());
    }

    #[test]
    fn test_load_flights_with_cutoff() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/flights/N123AB")
                .query_param("end", "2023-05-11T23:27:29Z");
            then.status(200).body(FLIGHTS);
        });

        let api = setup_aeroapi(&server);
        let cutoff = Utc.with_ymd_and_hms(2023, 5, 11, 23, 27, 29).unwrap();
        let reference = api.flight_ids_ref("N123AB", Some(cutoff));
        let data = api.load(&reference);
        m.assert();
        assert!(data.is_ok());
    }

    #[test]
    fn test_load_track() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET).path("/flights/N123AB-1/track");
            then.status(200).body(r#"{"positions": []}"#);
        });

        let api = setup_aeroapi(&server);
        let data = api.load(&api.track_ref("N123AB-1"));
        m.assert();
        assert_eq!(br#"{"positions": []}"#.to_vec(), data.unwrap());
    }

    #[rstest]
    #[case(401, "bad key")]
    #[case(404, "no such flight")]
    #[case(500, "")]
    fn test_load_bad_status(#[case] code: u16, #[case] text: &str) {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET).path("/flights/N123AB");
            then.status(code).body(text);
        });

        let api = setup_aeroapi(&server);
        let data = api.load("flights/N123AB");
        m.assert();
        match data {
            Err(SourceError::Status {
                reference,
                status,
                body,
            }) => {
                assert_eq!("flights/N123AB", reference);
                assert_eq!(code, status);
                assert_eq!(text, body);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_load_no_server() {
        let api = AeroApi::new("http://127.0.0.1:1", "", Options::default());
        let data = api.load("flights/N123AB");
        assert!(matches!(data, Err(SourceError::Retrieval { .. })));
    }
}
