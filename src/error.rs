//! Error types for Skriv.

use thiserror::Error;

/// Library-level error type for Skriv operations.
#[derive(Error, Debug)]
pub enum SkrivError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Malformed provider response: {0}")]
    Parse(String),

    #[error("Invalid audio buffer: {0}")]
    Audio(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Result type alias for Skriv operations.
pub type Result<T> = std::result::Result<T, SkrivError>;
