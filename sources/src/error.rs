use thiserror::Error;

/// Custom error type for sources, allow us to differentiate between errors.
///
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("couldn't get {reference}: {source}")]
    Retrieval {
        reference: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("couldn't get successful response for {reference}: status({status}), body({body})")]
    Status {
        reference: String,
        status: u16,
        body: String,
    },
    #[error("couldn't unmarshal {reference}: {source}")]
    Unmarshal {
        reference: String,
        source: serde_json::Error,
    },
    #[error("couldn't save {reference}: {source}")]
    Save {
        reference: String,
        source: std::io::Error,
    },
    #[error("unrecognized artifact({0})")]
    Configuration(String),
}
