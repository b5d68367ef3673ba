//! Turn the flights of one aircraft into rendered documents.
//!
//! The flight list comes first, then every track is loaded and rendered in the order of the
//! list, which is most recent first.  What happens when one of the flights fails is decided
//! by the `FailurePolicy`.
//!

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Deserialize;
use strum::{EnumString, VariantNames};
use tracing::{debug, info, trace, warn};

use fviz_common::Options;
use fviz_render::{Ensemble, RenderedDocument};
use fviz_sources::FlightApi;

use crate::{ConvertError, Failure};

/// What to do when one flight of a batch fails.
///
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    PartialEq,
    EnumString,
    strum::Display,
    VariantNames,
    ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FailurePolicy {
    /// Failing to load the first flight aborts, later failures are only reported
    #[default]
    FirstFatal,
    /// Every failure is reported, fail only when nothing was generated
    Tolerant,
    /// Without a flight count, the first load failure ends the batch
    StopAtGap,
}

/// Outcome of a batch.
///
#[derive(Debug, Default)]
pub struct Conversion {
    /// Rendered tracks in flight list order
    pub documents: Vec<RenderedDocument>,
    /// Flights we had to skip
    pub failures: Vec<Failure>,
}

#[derive(Debug)]
pub struct TrackConverter {
    api: FlightApi,
    ensemble: Ensemble,
    policy: FailurePolicy,
    opts: Options,
}

impl TrackConverter {
    pub fn new(api: FlightApi, ensemble: Ensemble) -> Self {
        TrackConverter {
            api,
            ensemble,
            policy: FailurePolicy::default(),
            opts: Options::default(),
        }
    }

    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn options(mut self, opts: Options) -> Self {
        self.opts = opts;
        self
    }

    /// Render up to `count` flights of `tail`, before `cutoff` if set.
    ///
    #[tracing::instrument(skip(self))]
    pub fn convert(
        &self,
        tail: &str,
        cutoff: Option<DateTime<Utc>>,
        count: Option<usize>,
    ) -> Result<Conversion, ConvertError> {
        let mut ids = self.api.flight_ids(tail, cutoff)?;

        let count = count.filter(|&n| n > 0);
        if let Some(n) = count {
            ids.truncate(n);
        }
        debug!("converting {} flight(s) for {tail}", ids.len());

        let mut res = Conversion::default();
        for (i, flight_id) in ids.iter().enumerate() {
            let track = match self.api.track(flight_id) {
                Ok(track) => track,
                Err(e) => match self.policy {
                    FailurePolicy::FirstFatal if i == 0 => return Err(e.into()),
                    FailurePolicy::StopAtGap if count.is_none() => {
                        info!("end of replay at {flight_id}: {e}");
                        break;
                    }
                    _ => {
                        res.failures.push(Failure::new(flight_id, e));
                        continue;
                    }
                },
            };

            match self.ensemble.generate(&track) {
                Ok(doc) => {
                    trace!("{flight_id} rendered");
                    res.documents.push(doc)
                }
                Err(e) => res.failures.push(Failure::new(flight_id, e)),
            }
        }

        self.report(&res.failures);

        if res.documents.is_empty() && !ids.is_empty() {
            return Err(ConvertError::NoTracks {
                tail: tail.to_owned(),
                failures: res.failures,
            });
        }
        if ids.is_empty() {
            warn!("no flight found for {tail}");
        }
        Ok(res)
    }

    /// Render the one track stored at `reference`.
    ///
    #[tracing::instrument(skip(self))]
    pub fn convert_single(
        &self,
        reference: &str,
        flight_id: &str,
    ) -> Result<RenderedDocument, ConvertError> {
        let track = self.api.track_at(reference, flight_id)?;
        Ok(self.ensemble.generate(&track)?)
    }

    fn report(&self, failures: &[Failure]) {
        if failures.is_empty() {
            return;
        }
        if self.opts.verbose {
            failures.iter().for_each(|f| warn!("{f}"));
        } else {
            warn!("not all tracks were generated, use verbose mode for more detail");
        }
    }
}
