use thiserror::Error;

use fviz_sources::SourceError;

/// Custom error type for rendering.
///
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("track for flight({0}) has no positions")]
    NoPositions(String),
    #[error("no layers configured for flight({0})")]
    NoLayers(String),
    #[error("no layer could be built for flight({0})")]
    NoSuccessfulLayer(String),
    #[error("unrecognized layer({0}), supported: {1}")]
    UnknownLayer(String, String),
    #[error("layer {layer} is missing asset {name}")]
    MissingAsset { layer: String, name: String },
    #[error("can not serialize KML: {0}")]
    Serialize(#[from] kml::Error),
}

/// Custom error type for archives.
///
#[derive(Debug, Error)]
pub enum PackagingError {
    #[error("can not build archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("couldn't write output artifact: {0}")]
    Write(#[from] SourceError),
}
