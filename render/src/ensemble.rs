//! The ensemble runs a set of layer builders over a track and merges their output into one
//! KML document.
//!
//! Layers are sorted by name and deduplicated so the document and its name do not depend on
//! the order they were asked for.
//!

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use kml::{Kml, KmlDocument, KmlVersion, KmlWriter};
use tracing::{debug, trace, warn};

use fviz_common::Options;
use fviz_formats::Track;

use crate::elements::leaf;
use crate::{Layer, LayerBuilder, RenderError};

const XMLNS: &str = "http://www.opengis.net/kml/2.2";
const XMLNS_GX: &str = "http://www.google.com/kml/ext/2.2";

/// One rendered track.
///
#[derive(Clone, Debug)]
pub struct RenderedDocument {
    pub flight_id: String,
    /// Serialized KML
    pub kml: Vec<u8>,
    /// Assets referenced by the document, by name
    pub assets: BTreeMap<String, Vec<u8>>,
    /// Time of the first position
    pub start: DateTime<Utc>,
    /// Time of the last position
    pub end: DateTime<Utc>,
    /// Layers actually present
    pub layers: Vec<String>,
}

#[derive(Debug)]
pub struct Ensemble {
    builders: Vec<Box<dyn LayerBuilder>>,
}

impl Ensemble {
    /// Create the ensemble from layer names.
    ///
    #[tracing::instrument]
    pub fn new(names: &[&str], opts: Options) -> Result<Self, RenderError> {
        let mut layers = names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(|n| {
                Layer::from_str(n)
                    .map_err(|_| RenderError::UnknownLayer(n.to_owned(), Layer::names().join(",")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        // `Layer` is ordered like the names
        //
        layers.sort();
        layers.dedup();
        trace!("layers={layers:?}");

        Ok(Self::with_builders(
            layers.into_iter().map(|l| l.builder(opts)).collect(),
        ))
    }

    /// Create the ensemble from any builders.
    ///
    pub fn with_builders(mut builders: Vec<Box<dyn LayerBuilder>>) -> Self {
        builders.sort_by(|a, b| a.name().cmp(b.name()));
        builders.dedup_by(|a, b| a.name() == b.name());
        Ensemble { builders }
    }

    /// Composite name of all layers
    ///
    pub fn name(&self) -> String {
        self.builders
            .iter()
            .map(|b| b.name())
            .collect::<Vec<_>>()
            .join("-")
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// Build every layer for `track` and assemble the document.
    ///
    /// A failing layer is skipped as long as one other succeeds.
    ///
    #[tracing::instrument(skip_all, fields(flight = %track.flight_id))]
    pub fn generate(&self, track: &Track) -> Result<RenderedDocument, RenderError> {
        let flight_id = track.flight_id.clone();

        let (Some(start), Some(end)) = (track.start(), track.end()) else {
            return Err(RenderError::NoPositions(flight_id));
        };
        if self.builders.is_empty() {
            return Err(RenderError::NoLayers(flight_id));
        }

        let mut parts = vec![];
        let mut assets = BTreeMap::new();
        let mut layers = vec![];
        for builder in &self.builders {
            match builder.build(&track.positions) {
                Ok(fragment) => {
                    trace!("{} built", builder.name());
                    parts.push(fragment.root);
                    assets.extend(fragment.assets);
                    layers.push(builder.name().to_owned());
                }
                Err(e) => warn!("{flight_id}: skipping layer {}: {e}", builder.name()),
            }
        }
        if layers.is_empty() {
            return Err(RenderError::NoSuccessfulLayer(flight_id));
        }

        let mut elements = vec![
            Kml::Element(leaf("name", format!("AeroAPI Flight {flight_id}"))),
            Kml::Element(leaf("description", format!("Layers: {}", layers.join(", ")))),
        ];
        elements.extend(parts);

        let doc = Kml::KmlDocument(KmlDocument {
            version: KmlVersion::V22,
            attrs: HashMap::from([("xmlns".to_owned(), XMLNS.to_owned())]),
            // One attribute per element keeps the output stable
            elements: vec![Kml::Document {
                attrs: HashMap::from([("xmlns:gx".to_owned(), XMLNS_GX.to_owned())]),
                elements,
            }],
        });

        let mut buf = vec![];
        KmlWriter::from_writer(&mut buf).write(&doc)?;
        debug!("{flight_id}: {} bytes of KML, {} asset(s)", buf.len(), assets.len());

        Ok(RenderedDocument {
            flight_id,
            kml: buf,
            assets,
            start,
            end,
            layers,
        })
    }
}
