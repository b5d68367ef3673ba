//! Small helpers to build the KML elements the `kml` crate has no type for (`gx:` extensions,
//! tours, time primitives).
//!

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use kml::types::Element;
use kml::Kml;

use fviz_formats::Position;

/// Element with text content
///
pub(crate) fn leaf(name: &str, content: impl ToString) -> Element {
    Element {
        name: name.to_owned(),
        attrs: HashMap::new(),
        content: Some(content.to_string()),
        children: vec![],
    }
}

/// Element with children
///
pub(crate) fn node(name: &str, children: Vec<Element>) -> Element {
    Element {
        name: name.to_owned(),
        attrs: HashMap::new(),
        content: None,
        children,
    }
}

/// Element with an `id` attribute and children
///
pub(crate) fn node_with_id(name: &str, id: &str, children: Vec<Element>) -> Element {
    Element {
        attrs: HashMap::from([("id".to_owned(), id.to_owned())]),
        ..node(name, children)
    }
}

/// Folder with a name and description ahead of its content
///
pub(crate) fn folder(name: &str, description: &str, elements: Vec<Kml>) -> Kml {
    let mut all = vec![
        Kml::Element(leaf("name", name)),
        Kml::Element(leaf("description", description)),
    ];
    all.extend(elements);
    Kml::Folder {
        attrs: HashMap::new(),
        elements: all,
    }
}

/// KML colours are `aabbggrr`
///
pub(crate) fn kml_color(r: u8, g: u8, b: u8, a: u8) -> String {
    format!("{a:02x}{b:02x}{g:02x}{r:02x}")
}

/// KML time
///
pub(crate) fn when(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `lon,lat,alt` as used in `<coordinates>`
///
pub(crate) fn coordinates(p: &Position) -> String {
    format!("{},{},{}", p.longitude, p.latitude, p.altitude_m())
}

/// `lon lat alt` as used in `<gx:coord>`
///
pub(crate) fn gx_coord(p: &Position) -> String {
    format!("{} {} {}", p.longitude, p.latitude, p.altitude_m())
}
