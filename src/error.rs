//! Error handling module for deploywiz
//!
//! Configuration problems (duplicate page keys, manifests that ask for pages
//! they cannot feed) are fatal and surface before the wizard starts. Queue
//! misuse (dispatching with no current page, jumping to a key that does not
//! exist) is reported to the caller, never swallowed.

use thiserror::Error;

/// Main error type for the wizard core and its collaborators
#[derive(Error, Debug)]
pub enum WizardError {
    /// A page with this key is already queued
    #[error("Duplicate page key: {key}")]
    DuplicateKey { key: String },

    /// Dispatch was called before init or after the run finished
    #[error("No current page: the wizard is not running")]
    NoCurrentPage,

    /// Jump or insertion target does not name a queued page
    #[error("Unknown page key: {key}")]
    UnknownTarget { key: String },

    /// Pages may only be inserted into the part of the queue not yet reached
    #[error("Cannot insert pages after '{key}': the wizard has already moved past it")]
    InsertBehindCursor { key: String },

    /// Configuration errors (missing manifest page, inconsistent flags)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Manifest discovery and parsing errors
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// IO errors (manifest files, variables file, terminal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for wizard operations
pub type Result<T> = std::result::Result<T, WizardError>;

impl WizardError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a manifest error
    pub fn manifest(msg: impl Into<String>) -> Self {
        Self::Manifest(msg.into())
    }

    /// Create a duplicate key error
    pub fn duplicate(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    /// Create an unknown target error
    pub fn unknown(key: impl Into<String>) -> Self {
        Self::UnknownTarget { key: key.into() }
    }

    /// True for errors that must stop the wizard before it starts
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::DuplicateKey { .. } | Self::Config(_) | Self::Manifest(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WizardError::config("zone requires a region");
        assert_eq!(err.to_string(), "Configuration error: zone requires a region");

        let err = WizardError::duplicate("region");
        assert_eq!(err.to_string(), "Duplicate page key: region");

        let err = WizardError::unknown("quit");
        assert_eq!(err.to_string(), "Unknown page key: quit");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WizardError = io_err.into();
        assert!(matches!(err, WizardError::Io(_)));
    }

    #[test]
    fn test_configuration_classification() {
        assert!(WizardError::duplicate("a").is_configuration());
        assert!(WizardError::config("bad").is_configuration());
        assert!(!WizardError::NoCurrentPage.is_configuration());
        assert!(!WizardError::unknown("x").is_configuration());
    }
}
