//! The visible path of the flight, optionally extruded to the ground.
//!

use kml::types::{
    AltitudeMode, Coord, Element, Geometry, LineString, LineStyle, Placemark, PolyStyle, Style,
};
use kml::Kml;

use fviz_formats::Position;

use crate::elements::{folder, kml_color, leaf};
use crate::{Fragment, Layer, LayerBuilder, RenderError};

const STYLE: &str = "FlightStyle";

/// Stroke and fill are the same colour, fill is lighter.
const STROKE_ALPHA: u8 = 127;
const FILL_ALPHA: u8 = 63;

const LINE_WIDTH: f64 = 3.;

#[derive(Clone, Debug)]
pub struct PathBuilder {
    /// RGB
    color: (u8, u8, u8),
    extrude: bool,
}

impl Default for PathBuilder {
    fn default() -> Self {
        PathBuilder {
            color: (217, 51, 255),
            extrude: true,
        }
    }
}

impl PathBuilder {
    pub fn color(mut self, r: u8, g: u8, b: u8) -> Self {
        self.color = (r, g, b);
        self
    }

    pub fn extrude(mut self, extrude: bool) -> Self {
        self.extrude = extrude;
        self
    }

    fn style(&self) -> Style {
        let (r, g, b) = self.color;
        Style {
            id: Some(STYLE.into()),
            line: LineStyle {
                color: kml_color(r, g, b, STROKE_ALPHA),
                width: LINE_WIDTH,
                ..Default::default()
            }
            .into(),
            poly: PolyStyle {
                color: kml_color(r, g, b, FILL_ALPHA),
                ..Default::default()
            }
            .into(),
            ..Default::default()
        }
    }
}

impl LayerBuilder for PathBuilder {
    fn name(&self) -> &str {
        "path"
    }

    #[tracing::instrument(skip_all)]
    fn build(&self, positions: &[Position]) -> Result<Fragment, RenderError> {
        let coords = positions
            .iter()
            .map(|p| Coord::new(p.longitude, p.latitude, Some(p.altitude_m())))
            .collect::<Vec<_>>();

        let ls = LineString {
            tessellate: false,
            extrude: self.extrude,
            altitude_mode: AltitudeMode::RelativeToGround,
            coords,
            ..Default::default()
        };

        let style_url: Element = leaf("styleUrl", format!("#{STYLE}"));
        let pm = Placemark {
            geometry: Some(Geometry::LineString(ls)),
            children: vec![style_url],
            ..Default::default()
        };

        let root = folder(
            "Path Track",
            Layer::Path.description(),
            vec![Kml::Style(self.style()), Kml::Placemark(pm)],
        );
        Ok(Fragment::new(root))
    }
}
