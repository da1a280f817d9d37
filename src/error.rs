//! Error types for OCI metadata operations.

use thiserror::Error;

/// Errors that can occur when fetching instance metadata.
///
/// All variants are terminal for the call that produced them; detectors turn
/// them into [`Detection::NotApplicable`](crate::Detection::NotApplicable).
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The request could not be built.
    #[error("failed to create request for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request could not be sent, or timed out.
    #[error("failed to query {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint replied with a non-200 status.
    #[error("{url} replied with status code: {status}")]
    Status { url: String, status: String },

    /// The response body could not be read.
    #[error("failed to read reply from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not a valid metadata document.
    #[error("failed to decode instance metadata reply: {0}")]
    Decode(#[from] serde_json::Error),

    /// The identity certificate endpoint did not return PEM data.
    #[error("failed to parse the certificate, not valid pem data")]
    InvalidPem,

    /// The identity certificate could not be parsed as X.509.
    #[error("failed to parse the certificate: {0}")]
    Certificate(#[from] x509_cert::der::Error),

    /// Response exceeds maximum allowed size.
    #[error("response too large: {0} bytes exceeds limit of {1} bytes")]
    TooLarge(usize, usize),
}

/// Errors raised while constructing a detector.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The HTTP client could not be created.
    #[error("failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The detector was handed configuration meant for another detector.
    #[error("detector {detector} does not accept {config} configuration")]
    Mismatch {
        detector: &'static str,
        config: &'static str,
    },

    /// An attribute extraction entry is unusable.
    #[error("invalid attribute path entry {0:?}: name and path must be non-empty")]
    InvalidJPath(String),
}
