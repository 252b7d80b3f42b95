/// Error types for model loading, configuration and button tokens
use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading a calculator model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("File too small to be a valid STL ({len} bytes)")]
    TooSmall { len: usize },

    #[error("Unexpected end of file in triangle {index} of {count}")]
    Truncated { index: usize, count: usize },

    #[error("Failed to parse ASCII STL near: {context}")]
    Ascii { context: String },

    #[error("Cannot read model {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from loading a scene configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A key token that names no calculator button
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown button token '{0}'")]
pub struct UnknownButton(pub String);
