// src/error.rs

//! Unified error handling for the aggregator.

use std::fmt;

use thiserror::Error;

/// Result type alias for aggregator operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Remote API answered with a non-2xx status
    #[error("Remote API error {status} ({status_text}) for {url}")]
    RemoteApi {
        status: u16,
        url: String,
        status_text: String,
    },

    /// Remote API omitted a pagination header (strict mode only)
    #[error("Missing or invalid pagination header '{header}' for {url}")]
    PaginationHeader { url: String, header: String },

    /// HTTP request failed (transport, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML front-matter parsing failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Content file front-matter could not be parsed
    #[error("Invalid front-matter in {path}: {message}")]
    FrontMatter { path: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request parameter validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requested content does not exist in any source
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Create a remote API error from a failed response.
    pub fn remote_api(status: u16, url: impl Into<String>, status_text: impl Into<String>) -> Self {
        Self::RemoteApi {
            status,
            url: url.into(),
            status_text: status_text.into(),
        }
    }

    /// Create a pagination header error.
    pub fn pagination_header(url: impl Into<String>, header: impl Into<String>) -> Self {
        Self::PaginationHeader {
            url: url.into(),
            header: header.into(),
        }
    }

    /// Create a front-matter parsing error.
    pub fn front_matter(path: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::FrontMatter {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Whether this error is a client-side mistake rather than a system failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}
