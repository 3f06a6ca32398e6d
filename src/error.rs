//! Error types for slsctl operations.
//!
//! This module defines [`SlsError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `SlsError` for configuration resolution failures that need distinct handling
//! - Use `anyhow::Error` (via `SlsError::Other`) for collaborator failures
//!   (network, identity service, platform), which propagate unchanged
//! - Every resolution error is fatal and non-retryable

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for slsctl operations.
#[derive(Debug, Error)]
pub enum SlsError {
    /// No instance configuration file in the expected directory.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse an instance configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A required field is absent after every override and resolution step.
    #[error("Missing required field '{field}' in instance configuration")]
    MissingField { field: String },

    /// Instances in a template disagree on org, app or stage.
    #[error("Inconsistent template: every instance must share one {field} (expected '{expected}', found '{actual}')")]
    InconsistentTemplate {
        field: String,
        expected: String,
        actual: String,
    },

    /// A `${...}` reference in inputs could not be resolved.
    #[error("Unresolved variable: ${{{name}}}")]
    UnresolvedVariable { name: String },

    /// A value cannot be persisted as a single `.env` line.
    #[error("Cannot write '{key}' to .env: value contains a line break")]
    InvalidEnvValue { key: String },

    /// The platform rejected an action.
    #[error("Platform {action} failed: {message}")]
    Platform { action: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlsError {
    /// Shorthand for [`SlsError::MissingField`].
    pub fn missing(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }
}

/// Result type alias for slsctl operations.
pub type Result<T> = std::result::Result<T, SlsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_displays_path() {
        let err = SlsError::ConfigNotFound {
            path: PathBuf::from("/srv/app/serverless.yml"),
        };
        assert!(err.to_string().contains("/srv/app/serverless.yml"));
    }

    #[test]
    fn missing_field_names_the_field() {
        let err = SlsError::missing("component");
        assert!(matches!(&err, SlsError::MissingField { field } if field == "component"));
        assert!(err.to_string().contains("'component'"));
    }

    #[test]
    fn inconsistent_template_displays_both_values() {
        let err = SlsError::InconsistentTemplate {
            field: "org".into(),
            expected: "O1".into(),
            actual: "O2".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("org"));
        assert!(msg.contains("'O1'"));
        assert!(msg.contains("'O2'"));
    }

    #[test]
    fn unresolved_variable_displays_placeholder() {
        let err = SlsError::UnresolvedVariable {
            name: "env:REGION".into(),
        };
        assert_eq!(err.to_string(), "Unresolved variable: ${env:REGION}");
    }

    #[test]
    fn platform_error_displays_action() {
        let err = SlsError::Platform {
            action: "deploy".into(),
            message: "HTTP 500".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("deploy"));
        assert!(msg.contains("HTTP 500"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: SlsError = io_err.into();
        assert!(matches!(err, SlsError::Io(_)));
    }

    #[test]
    fn anyhow_error_converts_to_other() {
        let err: SlsError = anyhow::anyhow!("identity service unreachable").into();
        assert!(matches!(err, SlsError::Other(_)));
        assert_eq!(err.to_string(), "identity service unreachable");
    }
}
