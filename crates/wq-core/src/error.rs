//! Centralized error types for WikiQuran.

use thiserror::Error;

/// Main error type for WikiQuran operations.
#[derive(Error, Debug)]
pub enum WqError {
    #[error("Ayah not found: {surah}:{verse}")]
    AyahNotFound { surah: i64, verse: i64 },

    #[error("Root not found: {0}")]
    RootNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] wq_db::DbError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for WikiQuran operations.
pub type WqResult<T> = Result<T, WqError>;

impl WqError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error signals an absent verse or root.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AyahNotFound { .. } | Self::RootNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_variants() {
        assert!(WqError::AyahNotFound { surah: 2, verse: 300 }.is_not_found());
        assert!(WqError::RootNotFound("zzz".into()).is_not_found());
        assert!(!WqError::validation("limit out of range").is_not_found());
    }

    #[test]
    fn test_messages() {
        let err = WqError::AyahNotFound { surah: 9, verse: 9 };
        assert_eq!(err.to_string(), "Ayah not found: 9:9");
        assert_eq!(WqError::config("bad").to_string(), "Configuration error: bad");
    }
}
