// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for Remora
//!
//! Capture never swallows transport errors: everything that goes wrong on
//! the wrapped path is surfaced to the caller exactly as the unwrapped
//! transport would have surfaced it.

use thiserror::Error;

/// Result type alias for Remora operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Remora
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Structured request target could not be assembled into a URL
    #[error("Invalid request target: {0}")]
    Target(String),

    /// No transport registered for the request's scheme
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// Installing or restoring the instrumented transports failed
    #[error("Interception error: {0}")]
    Interception(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True when the error originated below the HTTP layer (connection
    /// refused, reset, DNS failure) rather than in this crate.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Target("missing host".into());
        assert_eq!(err.to_string(), "Invalid request target: missing host");
    }

    #[test]
    fn test_url_error_conversion() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Url(_)));
        assert!(!err.is_transport());
    }
}
