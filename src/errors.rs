//! Error types for SmartMed
//!
//! One error enum for the whole library. Each variant belongs to an
//! [`ErrorCategory`], which decides how the shell reacts to it.

use crate::models::Disease;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SmartMed
#[derive(Error, Debug)]
pub enum SmartMedError {
    /// No artifact path configured for a disease
    #[error("No model artifact configured for {disease}")]
    ArtifactMissing { disease: Disease },

    /// Artifact could not be read from disk
    #[error("Failed to read model artifact {path:?}: {source}")]
    ArtifactUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact was readable but is not a valid model
    #[error("Corrupt model artifact {path:?}: {reason}")]
    ArtifactCorrupt { path: PathBuf, reason: String },

    /// Feature vector length does not match the schema
    #[error("{disease} expects {expected} features, got {actual}")]
    ArityMismatch {
        disease: Disease,
        expected: usize,
        actual: usize,
    },

    /// Feature value is NaN or infinite
    #[error("Feature '{feature}' is not a finite number")]
    NonFiniteFeature { feature: String },

    /// Classifier failed internally
    #[error("Classifier error: {0}")]
    ClassifierError(String),

    /// Chat credentials missing or invalid
    #[error("Chat configuration error: {0}")]
    ChatConfigError(String),

    /// Chat service could not be reached or answered badly
    #[error("Chat transport error: {0}")]
    ChatTransportError(String),
}

/// Result type alias for SmartMed operations
pub type Result<T> = std::result::Result<T, SmartMedError>;

/// How far an error is allowed to travel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Startup failure, the process refuses to serve
    Load,
    /// One prediction failed, the page stays usable
    Inference,
    /// Chat disabled for this session
    ChatConfig,
    /// One chat interaction failed, the user may resubmit
    ChatTransport,
}

impl SmartMedError {
    /// Category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            SmartMedError::ArtifactMissing { .. }
            | SmartMedError::ArtifactUnreadable { .. }
            | SmartMedError::ArtifactCorrupt { .. } => ErrorCategory::Load,
            SmartMedError::ArityMismatch { .. }
            | SmartMedError::NonFiniteFeature { .. }
            | SmartMedError::ClassifierError(_) => ErrorCategory::Inference,
            SmartMedError::ChatConfigError(_) => ErrorCategory::ChatConfig,
            SmartMedError::ChatTransportError(_) => ErrorCategory::ChatTransport,
        }
    }

    /// Short message suitable for the page banner.
    ///
    /// Detail stays in the log; the banner only says what the user can do.
    pub fn user_message(&self) -> String {
        match self {
            SmartMedError::ArityMismatch { disease, .. } => {
                format!("Failed to predict {}. {}", disease.display_name(), self)
            }
            SmartMedError::NonFiniteFeature { .. } => {
                format!("Invalid input: {}. Please check the form values.", self)
            }
            SmartMedError::ClassifierError(_) => {
                "The classifier failed on this input. Please try again.".to_string()
            }
            SmartMedError::ChatConfigError(_) => {
                "Failed to configure the chat service. Please check your API key.".to_string()
            }
            SmartMedError::ChatTransportError(_) => {
                "Failed to get a response from the chat service. Please try again.".to_string()
            }
            SmartMedError::ArtifactMissing { .. }
            | SmartMedError::ArtifactUnreadable { .. }
            | SmartMedError::ArtifactCorrupt { .. } => {
                "Failed to load models. Please check the model files.".to_string()
            }
        }
    }

    /// True when the process must not keep serving
    pub fn is_fatal(&self) -> bool {
        self.category() == ErrorCategory::Load
    }
}
