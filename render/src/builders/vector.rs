//! Speed vectors along the flight.
//!
//! For every pair of consecutive reports we draw two arrows at the earlier one:
//!
//! - the *reported* heading and ground speed, in yellow
//! - the *imputed* bearing and ground speed derived from the move to the next report, in cyan
//!
//! Arrows are rotated along the heading and scaled with the speed.  Their balloon compares
//! reported and derived values for both ends of the pair.
//!

use kml::Kml;
use tracing::trace;

use fviz_formats::{bearing, ground_speed_knots, Position};

use crate::elements::{coordinates, folder, kml_color, leaf, node, node_with_id, when};
use crate::{Fragment, Layer, LayerBuilder, RenderError};

/// Default arrow icon
const ARROW_NAME: &str = "blue_fast_arrow.png";
const ARROW: &[u8] = include_bytes!("../../assets/blue_fast_arrow.png");

#[derive(Clone, Debug)]
pub struct VectorBuilder {
    icon_name: String,
    icon: Vec<u8>,
}

impl Default for VectorBuilder {
    fn default() -> Self {
        VectorBuilder {
            icon_name: ARROW_NAME.to_owned(),
            icon: ARROW.to_vec(),
        }
    }
}

/// One arrow to draw.
///
struct Arrow<'a> {
    style: String,
    balloon: String,
    color: String,
    heading: f64,
    speed: f64,
    at: &'a Position,
}

impl VectorBuilder {
    /// Use another icon for the arrows
    ///
    pub fn icon(mut self, name: &str, data: &[u8]) -> Self {
        self.icon_name = name.to_owned();
        self.icon = data.to_vec();
        self
    }

    fn arrow(&self, a: Arrow) -> [Kml; 2] {
        let style = node_with_id(
            "Style",
            &a.style,
            vec![
                node(
                    "IconStyle",
                    vec![
                        leaf("color", &a.color),
                        leaf("scale", a.speed / 100.),
                        leaf("heading", a.heading - 90.),
                        node("Icon", vec![leaf("href", &self.icon_name)]),
                    ],
                ),
                node("BalloonStyle", vec![leaf("text", &a.balloon)]),
            ],
        );
        let placemark = node(
            "Placemark",
            vec![
                leaf("styleUrl", format!("#{}", a.style)),
                node(
                    "Point",
                    vec![
                        leaf("altitudeMode", "absolute"),
                        leaf("coordinates", coordinates(a.at)),
                    ],
                ),
            ],
        );
        [Kml::Element(style), Kml::Element(placemark)]
    }
}

fn reported_description(this: &Position, next: &Position) -> String {
    let one = |title: &str, p: &Position| {
        format!(
            "<h3>{title}</h3><ul>\
            <li>Time: {}</li>\
            <li>Location: [{} {}]</li>\
            <li>Altitude: {:.0}'</li>\
            <li>Heading: {:.1}º</li>\
            <li>Groundspeed: {:.1}kt</li>\
            </ul>",
            when(p.timestamp),
            p.latitude,
            p.longitude,
            p.altitude_ft(),
            p.heading,
            p.groundspeed
        )
    };
    format!(
        "<h2>Reported by AeroAPI</h2>{}{}",
        one("This Location", this),
        one("Next Location", next)
    )
}

fn imputed_description(heading: f64, speed: f64) -> String {
    format!(
        "<h2>Imputed From Location Change</h2><ul>\
        <li>Heading: {heading:.1}º</li>\
        <li>Groundspeed: {speed:.1}kt</li>\
        </ul>"
    )
}

impl LayerBuilder for VectorBuilder {
    fn name(&self) -> &str {
        "vector"
    }

    #[tracing::instrument(skip_all)]
    fn build(&self, positions: &[Position]) -> Result<Fragment, RenderError> {
        if self.icon.is_empty() {
            return Err(RenderError::MissingAsset {
                layer: self.name().to_owned(),
                name: self.icon_name.clone(),
            });
        }

        let reported_color = kml_color(255, 255, 0, 255);
        let imputed_color = kml_color(0, 255, 255, 255);

        let mut elements = vec![];
        for (i, pair) in positions.windows(2).enumerate() {
            let (this, next) = (&pair[0], &pair[1]);

            let reported = reported_description(this, next);
            elements.extend(self.arrow(Arrow {
                style: format!("heading-icon{i}"),
                balloon: format!("<h1>Reported</h1>{reported}"),
                color: reported_color.clone(),
                heading: this.heading,
                speed: this.groundspeed,
                at: this,
            }));

            // Two reports at the same time have no speed
            //
            let geo_heading = bearing(this, next);
            let geo_speed = ground_speed_knots(this, next).unwrap_or_default();
            trace!("pair {i}: bearing={geo_heading} gs={geo_speed}");
            elements.extend(self.arrow(Arrow {
                style: format!("bearing-icon{i}"),
                balloon: format!(
                    "<h1>Imputed</h1>{}{reported}",
                    imputed_description(geo_heading, geo_speed)
                ),
                color: imputed_color.clone(),
                heading: geo_heading,
                speed: geo_speed,
                at: this,
            }));
        }

        // No arrow, no icon to ship
        //
        let with_icon = !elements.is_empty();
        let root = folder("Vector Track", Layer::Vector.description(), elements);
        let fragment = Fragment::new(root);
        if with_icon {
            Ok(fragment.with_asset(&self.icon_name, &self.icon))
        } else {
            Ok(fragment)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use kml::types::Element;
    use rstest::rstest;

    use super::*;
    use crate::builders::testdata::positions;

    /// Count placemarks and styles of a vector layer, by element name.
    ///
    fn census(f: &Fragment) -> HashMap<String, usize> {
        let mut count = HashMap::new();
        if let Kml::Folder { elements, .. } = &f.root {
            for e in elements {
                if let Kml::Element(Element { name, .. }) = e {
                    *count.entry(name.clone()).or_insert(0) += 1;
                }
            }
        }
        count
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 0)]
    #[case(2, 1)]
    #[case(12, 11)]
    fn test_vector_pairs(#[case] n: usize, #[case] pairs: usize) {
        let f = VectorBuilder::default().build(&positions(n)).unwrap();

        let count = census(&f);
        assert_eq!(2 * pairs, count.get("Placemark").copied().unwrap_or(0));
        assert_eq!(2 * pairs, count.get("Style").copied().unwrap_or(0));
        assert_eq!(pairs > 0, f.assets.contains_key("blue_fast_arrow.png"));
    }

    #[test]
    fn test_vector_asset() {
        let f = VectorBuilder::default().build(&positions(3)).unwrap();

        assert_eq!(1, f.assets.len());
        let icon = f.assets.get("blue_fast_arrow.png").unwrap();
        assert!(icon.starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_vector_missing_asset() {
        let b = VectorBuilder::default().icon("arrow.png", b"");
        let res = b.build(&positions(3));
        assert!(matches!(
            res,
            Err(RenderError::MissingAsset { ref layer, ref name }) if layer == "vector" && name == "arrow.png"
        ));
    }

    #[test]
    fn test_vector_arrows() {
        let pos = positions(2);
        let f = VectorBuilder::default().build(&pos).unwrap();
        let Kml::Folder { elements, .. } = &f.root else {
            panic!("not a folder");
        };

        let styles = elements
            .iter()
            .filter_map(|e| match e {
                Kml::Element(s) if s.name == "Style" => Some(s.clone()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(Some(&"heading-icon0".to_owned()), styles[0].attrs.get("id"));
        assert_eq!(Some(&"bearing-icon0".to_owned()), styles[1].attrs.get("id"));

        let icon_style = &styles[0].children[0];
        let get = |name: &str| {
            icon_style
                .children
                .iter()
                .find(|c| c.name == name)
                .and_then(|c| c.content.clone())
        };
        assert_eq!(Some("ff00ffff".to_string()), get("color"));
        assert_eq!(Some((pos[0].groundspeed / 100.).to_string()), get("scale"));
        assert_eq!(Some((pos[0].heading - 90.).to_string()), get("heading"));

        let imputed = &styles[1].children[0];
        let color = imputed.children.iter().find(|c| c.name == "color").unwrap();
        assert_eq!(Some("ffffff00".to_string()), color.content);
    }

    #[test]
    fn test_reported_description_uses_next() {
        let pos = positions(2);
        let text = reported_description(&pos[0], &pos[1]);
        assert!(text.contains(&format!("Heading: {:.1}º", pos[1].heading)));
        assert!(text.contains(&format!("Groundspeed: {:.1}kt", pos[1].groundspeed)));
    }
}
