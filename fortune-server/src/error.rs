//! Error types for link decoding, the daily counter store and configuration.
//!
//! None of these ever reach the user as text: the route layer turns a
//! `LinkError` into a redirect to the intro screen and a `StoreError` into a
//! silent local fallback.

use thiserror::Error;

/// Why a shareable link could not be resolved into a fortune.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("missing required link field `{0}`")]
    MissingField(&'static str),

    #[error("link field `{field}` is not an integer: {value:?}")]
    InvalidInteger { field: &'static str, value: String },

    #[error("link field `{field}` index {index} is out of range")]
    OutOfRange { field: &'static str, index: usize },

    #[error("unknown lucky color {0:?}")]
    UnknownColor(String),

    #[error("unknown lucky place {0:?}")]
    UnknownPlace(String),
}

/// Failures of the daily counter store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("remote store is not configured")]
    NotConfigured,

    #[error("invalid remote store endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("remote store responded with status {0}")]
    Status(u16),

    #[error("malformed store payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Failures while applying the host-supplied configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid loading dwell: {0}ms")]
    InvalidDwell(u32),
}
