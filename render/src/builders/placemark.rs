//! The whole flight as one moving placemark, through a `gx:Track`.
//!

use kml::Kml;

use fviz_formats::Position;

use crate::elements::{folder, gx_coord, leaf, node, when};
use crate::{Fragment, Layer, LayerBuilder, RenderError};

#[derive(Clone, Copy, Debug, Default)]
pub struct PlacemarkBuilder;

impl LayerBuilder for PlacemarkBuilder {
    fn name(&self) -> &str {
        "placemark"
    }

    #[tracing::instrument(skip_all)]
    fn build(&self, positions: &[Position]) -> Result<Fragment, RenderError> {
        // All the `when` first then all the `gx:coord`, in the same order
        //
        let track = positions
            .iter()
            .map(|p| leaf("when", when(p.timestamp)))
            .chain(positions.iter().map(|p| leaf("gx:coord", gx_coord(p))))
            .collect::<Vec<_>>();

        let placemark = node("Placemark", vec![node("gx:Track", track)]);
        let root = folder(
            "Placemark Track",
            Layer::Placemark.description(),
            vec![Kml::Element(placemark)],
        );
        Ok(Fragment::new(root))
    }
}
