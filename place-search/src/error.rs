//! Error types for the place-search crate.
//!
//! Messages are stable strings suitable for display. Credentials never
//! appear in error messages; a rejected response carries only the status
//! code and the body the provider sent back.

/// Errors that can occur while fetching, merging or filtering places.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The backend answered with a non-success status.
    ///
    /// Fatal to the current query only: remaining pages of that query are
    /// skipped and the aggregator moves on. Never retried.
    #[error("backend rejected request with status {status}: {body}")]
    BackendRejected {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Raw response body, unmodified.
        body: String,
    },

    /// A single fetched item lacked a required field.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// A required credential or query input was not supplied.
    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),

    /// A configuration value is present but invalid.
    #[error("config error: {0}")]
    Config(String),

    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response body could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

impl SearchError {
    /// Whether this error stops only the current query rather than the
    /// whole search.
    pub fn is_query_local(&self) -> bool {
        matches!(
            self,
            Self::BackendRejected { .. } | Self::Http(_) | Self::Parse(_) | Self::MalformedRecord(_)
        )
    }
}

/// Convenience type alias for place-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_backend_rejected() {
        let err = SearchError::BackendRejected {
            status: 401,
            body: r#"{"errorType":"AccessDeniedError"}"#.into(),
        };
        assert_eq!(
            err.to_string(),
            r#"backend rejected request with status 401: {"errorType":"AccessDeniedError"}"#
        );
    }

    #[test]
    fn display_configuration_missing() {
        let err = SearchError::ConfigurationMissing("Kakao REST API key".into());
        assert_eq!(err.to_string(), "configuration missing: Kakao REST API key");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("page_size must be greater than 0".into());
        assert_eq!(err.to_string(), "config error: page_size must be greater than 0");
    }

    #[test]
    fn display_http() {
        let err = SearchError::Http("connection refused".into());
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }

    #[test]
    fn display_parse() {
        let err = SearchError::Parse("expected value at line 1".into());
        assert_eq!(err.to_string(), "parse error: expected value at line 1");
    }

    #[test]
    fn query_local_classification() {
        assert!(SearchError::BackendRejected {
            status: 429,
            body: String::new()
        }
        .is_query_local());
        assert!(SearchError::Http("timeout".into()).is_query_local());
        assert!(!SearchError::ConfigurationMissing("region".into()).is_query_local());
        assert!(!SearchError::Config("bad".into()).is_query_local());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
