//! Error types for the findfood application.

use place_search::SearchError;

/// Top-level error type for the application layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Search failed before or during aggregation.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Configuration file could not be parsed or written.
    #[error("config error: {0}")]
    Config(String),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_errors_display_unchanged() {
        let err = AppError::from(SearchError::ConfigurationMissing("region".into()));
        assert_eq!(err.to_string(), "configuration missing: region");
    }

    #[test]
    fn io_errors_convert() {
        let err = AppError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(matches!(err, AppError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn app_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AppError>();
    }
}
