//! QF-prefixed error types with structured error codes.

#![allow(missing_docs)]

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, FunnelError>;

/// Top-level error type for the quiz-selection funnel.
///
/// Mirrors the failure taxonomy the funnel cares about: configuration
/// problems are permanent, boundary (catalog/resolver/progress) failures are
/// retryable and never fatal to the surrounding dashboard.
#[derive(Debug, Error)]
pub enum FunnelError {
    #[error("[QF-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[QF-1002] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[QF-2001] catalog unavailable: {details}")]
    CatalogUnavailable { details: String },

    #[error("[QF-2101] bundle resolution failed: {details}")]
    ResolveFailed { details: String },

    #[error("[QF-2102] quiz search failed: {details}")]
    SearchFailed { details: String },

    #[error("[QF-2201] progress tracker unavailable: {details}")]
    ProgressUnavailable { details: String },

    #[error("[QF-3001] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },
}

impl FunnelError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "QF-1001",
            Self::ConfigParse { .. } => "QF-1002",
            Self::CatalogUnavailable { .. } => "QF-2001",
            Self::ResolveFailed { .. } => "QF-2101",
            Self::SearchFailed { .. } => "QF-2102",
            Self::ProgressUnavailable { .. } => "QF-2201",
            Self::Serialization { .. } => "QF-3001",
        }
    }

    /// Whether retrying might resolve the failure.
    ///
    /// Boundary fetches are retryable; bad configuration is not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CatalogUnavailable { .. }
                | Self::ResolveFailed { .. }
                | Self::SearchFailed { .. }
                | Self::ProgressUnavailable { .. }
        )
    }

    /// Convenience constructor for resolver failures.
    #[must_use]
    pub fn resolve(details: impl Into<String>) -> Self {
        Self::ResolveFailed {
            details: details.into(),
        }
    }
}

impl From<serde_json::Error> for FunnelError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for FunnelError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
