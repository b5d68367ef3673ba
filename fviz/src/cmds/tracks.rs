//! The `tracks` command.
//!
//! Pick the source from the options, run the converter and save every rendered flight as a KMZ
//! file in the artifacts directory.
//!

use std::path::PathBuf;

use eyre::{eyre, Result};
use tracing::{debug, info, trace, warn};

use fviz_common::Options;
use fviz_render::{archive_name, Ensemble, Packager, RenderedDocument};
use fviz_sources::{AeroApi, FileStore, FlightApi, Snapshot, SourceKind};

use crate::{Config, Conversion, ConvertError, TrackConverter, TracksOpts};

/// Generate the archives and return their paths, in flight order.
///
#[tracing::instrument(skip(cfg))]
pub fn generate_tracks(cfg: &Config, opts: Options, topts: &TracksOpts) -> Result<Vec<PathBuf>> {
    let opts = opts.banking(!topts.no_banking);
    let layers = topts.layers.split(',').collect::<Vec<_>>();
    let ensemble = Ensemble::new(&layers, opts)?;
    debug!("layers: {}", ensemble.name());

    let artifacts_dir = topts
        .artifacts_dir
        .clone()
        .unwrap_or_else(|| cfg.artifacts_dir.clone());
    let policy = topts.on_error.unwrap_or(cfg.on_error);
    let tail = topts.tail_number.as_deref();

    let kind = SourceKind::classify(topts.from_artifact.as_deref()).validate()?;
    trace!("source is {kind}");

    if kind.is_artifact() && topts.save_artifacts {
        // Already local, nothing to save
        //
        warn!("inappropriate save artifacts option ignored");
    }

    let docs = match kind {
        SourceKind::SingleTrack { path, flight_id } => {
            let api = FlightApi::new(Box::new(Snapshot::new(&artifacts_dir, opts)));
            let conv = TrackConverter::new(api, ensemble).options(opts);
            vec![conv.convert_single(&path, &flight_id)?]
        }
        SourceKind::MultiTrack { path } => {
            let snap = Snapshot::new(&artifacts_dir, opts).with_flight_ids_file(&path);
            let conv = TrackConverter::new(FlightApi::new(Box::new(snap)), ensemble)
                .policy(policy)
                .options(opts);
            let Conversion { documents, .. } =
                conv.convert(tail.unwrap_or(&path), topts.cutoff, topts.flight_count)?;
            documents
        }
        SourceKind::Remote => {
            let tail = tail.ok_or_else(|| eyre!("a tail number is needed to query AeroAPI"))?;
            if cfg.api_key.is_empty() {
                return Err(eyre!("no AeroAPI key, set api_key or AEROAPI_API_KEY"));
            }

            let aero = AeroApi::new(&cfg.api_url, &cfg.api_key, opts);
            let mut api = FlightApi::new(Box::new(aero));
            if topts.save_artifacts {
                api = api.with_saver(Box::new(Snapshot::new(&artifacts_dir, opts)));
            }
            let conv = TrackConverter::new(api, ensemble)
                .policy(policy)
                .options(opts);
            let Conversion { documents, .. } =
                conv.convert(tail, topts.cutoff, topts.flight_count)?;
            documents
        }
        SourceKind::Unrecognized(path) => return Err(eyre!("unrecognized artifact({path})")),
    };

    Ok(save_archives(&artifacts_dir, tail, &docs, opts)?)
}

/// Write one KMZ per document, named after `tail` or the flight.
///
fn save_archives(
    artifacts_dir: &str,
    tail: Option<&str>,
    docs: &[RenderedDocument],
    opts: Options,
) -> Result<Vec<PathBuf>, ConvertError> {
    if opts.verbose || docs.len() > 1 {
        info!("writing {} KMZ file(s)", docs.len());
    }

    let packager = Packager::new();
    docs.iter()
        .map(|doc| -> Result<PathBuf, ConvertError> {
            let name = tail.unwrap_or(&doc.flight_id);
            let fname = PathBuf::from(artifacts_dir).join(archive_name(name, doc));
            packager.save(&FileStore, &fname.to_string_lossy(), doc)?;
            debug!("wrote {fname:?}");
            Ok(fname)
        })
        .collect()
}
