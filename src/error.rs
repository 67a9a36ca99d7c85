//! Error types for the loading edges of the crate.
//!
//! The analyzers themselves never fail; only reading files, decoding JSON and
//! assembling settings can.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid terminology dictionary: {}", .0.join(", "))]
    InvalidDictionary(Vec<String>),
}

pub type Result<T> = std::result::Result<T, GeoError>;
