//! Contract error types for the configuration core
//!
//! These errors are transport-agnostic. Collaborator implementations map
//! their own failures into [`ConfigError::External`] at the call site; no
//! fault from an external call escapes as a panic or an untyped error.

/// Configuration core errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Export blocked because required fields are missing
    ///
    /// Carries the full ordered list of human-readable labels; the document
    /// itself is untouched and the user can correct and retry.
    Validation {
        /// Missing-field labels in check order
        missing: Vec<String>,
    },
    /// A section update was rejected (unknown section or malformed shape)
    ///
    /// The document is returned unchanged; the caller surfaces this as a
    /// no-op, never as a partial write.
    RejectedUpdate {
        /// Section key the caller used
        section: String,
        /// What was wrong with the payload
        reason: String,
    },
    /// A collaborator call (vault, identity, catalogue, service control) failed
    External {
        /// Which collaborator failed
        operation: String,
        /// Failure message, reported verbatim to the user
        message: String,
    },
    /// A collaborator call exceeded its bounded wait
    Timeout {
        /// Which collaborator timed out
        operation: String,
    },
    /// A save was requested while another one is still in flight
    SaveInProgress,
    /// No authenticated session
    NotLoggedIn,
}

impl ConfigError {
    /// Shorthand for collaborator failures
    pub fn external(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::External {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Shorthand for rejected section updates
    pub fn rejected(section: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RejectedUpdate {
            section: section.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { missing } => {
                write!(f, "Missing required fields: {}", missing.join(", "))
            }
            Self::RejectedUpdate { section, reason } => {
                write!(f, "Update to section '{}' rejected: {}", section, reason)
            }
            Self::External { operation, message } => {
                write!(f, "{} failed: {}", operation, message)
            }
            Self::Timeout { operation } => {
                write!(f, "{} timed out", operation)
            }
            Self::SaveInProgress => {
                write!(f, "A save is already in progress")
            }
            Self::NotLoggedIn => {
                write!(f, "No active session")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
