//! This module implement a subset of [FlightAware]'s [AeroAPI] data model.
//!
//! Only the struct we need are there, this is not a general client API.  Every field has a
//! default so partial or empty responses still deserialize.
//!
//! [FlightAware]: https://flightaware.com/
//! [AeroAPI]: https://flightaware.com/aeroapi/portal/documentation
//!

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

/// Feet per metre
const FEET_PER_METER: f64 = 3.28084;

/// Answer to `/flights/{ident}`
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct FlightsResponse {
    pub flights: Vec<Flight>,
}

impl FlightsResponse {
    pub fn from_json(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    /// Flight ids, in the order given by the service (most recent first)
    ///
    pub fn flight_ids(&self) -> Vec<String> {
        self.flights.iter().map(|f| f.fa_flight_id.clone()).collect()
    }
}

/// One flight instance
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Flight {
    /// FlightAware flight id
    pub fa_flight_id: String,
}

/// One position report, as found in `/flights/{id}/track`
///
/// AeroAPI sends `null` for some samples (heading mostly), these are read as 0.
///
#[serde_as]
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Position {
    /// Altitude in hundreds of feet
    #[serde_as(as = "DefaultOnNull")]
    pub altitude: f64,
    /// Ground speed in knots
    #[serde_as(as = "DefaultOnNull")]
    pub groundspeed: f64,
    /// Heading, 0..359
    #[serde_as(as = "DefaultOnNull")]
    pub heading: f64,
    /// Latitude, -90..90
    #[serde_as(as = "DefaultOnNull")]
    pub latitude: f64,
    /// Longitude, -180..180
    #[serde_as(as = "DefaultOnNull")]
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

impl Position {
    /// Altitude converted into metres
    ///
    #[inline]
    pub fn altitude_m(&self) -> f64 {
        self.altitude * 100. / FEET_PER_METER
    }

    /// Altitude in feet
    ///
    #[inline]
    pub fn altitude_ft(&self) -> f64 {
        self.altitude * 100.
    }
}

/// The position sequence of one flight, ordered by time.
///
/// The flight id is not part of the answer, it is filled in by whoever asked for it.
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Track {
    #[serde(skip)]
    pub flight_id: String,
    #[serde(default)]
    pub positions: Vec<Position>,
}

impl Track {
    pub fn from_json(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    #[inline]
    pub fn with_flight_id(mut self, flight_id: &str) -> Self {
        self.flight_id = flight_id.to_owned();
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Time of the first report
    ///
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.positions.first().map(|p| p.timestamp)
    }

    /// Time of the last report
    ///
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.positions.last().map(|p| p.timestamp)
    }
}
