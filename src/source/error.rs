//! Error types for the verse service client.
//!
//! Variants carry the request URL so log lines and user-facing messages name
//! the exact lookup that failed.

use thiserror::Error;

/// Errors that can occur while talking to the verse service.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-success response where a verse was required.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Response body was not the expected verse payload.
    #[error("unexpected payload from {url}: {message}")]
    Decode {
        /// The URL whose body failed to decode.
        url: String,
        /// Decoder error text.
        message: String,
    },

    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid verse service URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl SourceError {
    /// Creates a network error, mapping reqwest timeouts to [`SourceError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            return Self::Timeout { url };
        }
        Self::Network { url, source }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a decode error.
    pub fn decode(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Returns true for failures a user retry could plausibly fix.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => true,
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            Self::Decode { .. } | Self::InvalidUrl { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_timeout_display() {
        let error = SourceError::timeout("https://bolls.life/get-verse/KJV/1/1/1/");
        assert!(error.to_string().contains("timeout"));
        assert!(error.to_string().contains("/get-verse/KJV/1/1/1/"));
    }

    #[test]
    fn test_source_error_http_status_display() {
        let error = SourceError::http_status("https://bolls.life/get-random-verse/WEB/", 503);
        let msg = error.to_string();
        assert!(msg.contains("503"), "Expected '503' in: {msg}");
        assert!(msg.contains("get-random-verse"), "Expected URL in: {msg}");
    }

    #[test]
    fn test_source_error_decode_display() {
        let error = SourceError::decode("https://bolls.life/x/", "expected value at line 1");
        let msg = error.to_string();
        assert!(msg.contains("unexpected payload"), "Expected prefix in: {msg}");
        assert!(msg.contains("expected value"), "Expected decoder text in: {msg}");
    }

    #[test]
    fn test_source_error_transient_classification() {
        assert!(SourceError::timeout("u").is_transient());
        assert!(SourceError::http_status("u", 502).is_transient());
        assert!(SourceError::http_status("u", 429).is_transient());
        assert!(!SourceError::http_status("u", 404).is_transient());
        assert!(!SourceError::decode("u", "bad").is_transient());
        assert!(!SourceError::invalid_url("nope").is_transient());
    }
}
