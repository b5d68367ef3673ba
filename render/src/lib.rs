//! Turn flight tracks into KML documents and KMZ archives.
//!
//! Each representation of a track is a *layer*, built by its own `LayerBuilder`.  An `Ensemble`
//! runs a sorted set of builders over one track and merges what they produce into a single
//! document along with the binary assets they reference (icons).  The `Packager` then bundles
//! document and assets into a KMZ archive.
//!

use std::collections::BTreeMap;
use std::fmt::Debug;

use kml::Kml;
use strum::{EnumString, VariantNames};

use fviz_common::Options;
use fviz_formats::Position;

// Re-export for convenience
//
pub use builders::*;
pub use ensemble::*;
pub use error::*;
pub use kmz::*;

mod builders;
mod elements;
mod ensemble;
mod error;
mod kmz;

/// What one builder hands back: a single KML element and the assets it references.
///
#[derive(Clone, Debug)]
pub struct Fragment {
    pub root: Kml,
    pub assets: BTreeMap<String, Vec<u8>>,
}

impl Fragment {
    pub fn new(root: Kml) -> Self {
        Fragment {
            root,
            assets: BTreeMap::new(),
        }
    }

    pub fn with_asset(mut self, name: &str, data: &[u8]) -> Self {
        self.assets.insert(name.to_owned(), data.to_vec());
        self
    }
}

/// Every layer is built through this.
///
pub trait LayerBuilder: Debug {
    /// Layer name, used for sorting and in the document description
    fn name(&self) -> &str;
    /// Build the layer for the positions of one track
    fn build(&self, positions: &[Position]) -> Result<Fragment, RenderError>;
}

/// Known layers
///
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    EnumString,
    strum::Display,
    VariantNames,
)]
#[strum(serialize_all = "lowercase")]
pub enum Layer {
    /// First-person flythrough
    Camera,
    /// Line along the flight, extruded to the ground
    Path,
    /// Single moving placemark
    Placemark,
    /// Reported and imputed speed vectors
    Vector,
}

impl Layer {
    /// Builder for this layer with the run options
    ///
    pub fn builder(self, opts: Options) -> Box<dyn LayerBuilder> {
        match self {
            Layer::Camera => Box::new(CameraBuilder::new(opts)),
            Layer::Path => Box::new(PathBuilder::default()),
            Layer::Placemark => Box::new(PlacemarkBuilder),
            Layer::Vector => Box::new(VectorBuilder::default()),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Layer::Camera => "First-person view of the flight",
            Layer::Path => "Visible flight path, optionally extruded to the ground",
            Layer::Placemark => "Flight path track across the ground in a single Placemark",
            Layer::Vector => "Vectors along flight path reflecting performance data",
        }
    }

    /// All layer names
    ///
    pub fn names() -> &'static [&'static str] {
        Layer::VARIANTS
    }
}

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
