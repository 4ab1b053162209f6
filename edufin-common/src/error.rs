//! Error types for the EduFin chat service.

use thiserror::Error;

/// Result type alias using the EduFin error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the EduFin service.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or request shape; rejected before any side effect
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The completion provider responded with a non-success status
    #[error("Completion provider error{}: {message}", .status.map_or_else(String::new, |s| format!(" ({s})")))]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// The completion provider response could not be parsed into a completion
    #[error("Malformed completion response: {0}")]
    UpstreamFormat(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Database(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Check if this is a validation error.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an upstream (completion provider) error.
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::UpstreamFormat(_))
    }

    /// Get HTTP status code for this error.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Upstream { .. } | Self::UpstreamFormat(_) => 502,
            _ => 500,
        }
    }

    /// Stable machine-readable code for API error responses.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::UpstreamFormat(_) => "UPSTREAM_MALFORMED",
            Self::Database(_) => "STORAGE_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
