use crate::identity::FilterId;
use crate::model::FilterKind;
use thiserror::Error;

/// Broad grouping of [`SmartSearchError`] variants.
///
/// Hosts use this to decide how to surface a failure: validation errors go back
/// to the form, identity and precondition errors point at a desynced UI, and
/// persistence errors leave the session open for a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Identity,
    Precondition,
    Persistence,
}

#[derive(Error, Debug)]
pub enum SmartSearchError {
    #[error("Unknown filter type: {0}")]
    UnknownKind(String),

    #[error("Malformed filter: {0}")]
    Malformed(String),

    #[error("Filter config for {kind} is missing required field `{field}`")]
    MissingField {
        kind: FilterKind,
        field: &'static str,
    },

    #[error("Invalid {kind} filter config: {reason}")]
    InvalidConfig { kind: FilterKind, reason: String },

    #[error("Expected a {expected} filter, got {actual}")]
    KindMismatch {
        expected: FilterKind,
        actual: FilterKind,
    },

    #[error("Filter not found: {0}")]
    FilterNotFound(FilterId),

    #[error("Cannot {action} while {state}")]
    Precondition {
        action: &'static str,
        state: &'static str,
    },

    #[error("Editing session is closed")]
    SessionClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl SmartSearchError {
    pub fn class(&self) -> ErrorClass {
        match self {
            SmartSearchError::UnknownKind(_)
            | SmartSearchError::Malformed(_)
            | SmartSearchError::MissingField { .. }
            | SmartSearchError::InvalidConfig { .. }
            | SmartSearchError::KindMismatch { .. }
            | SmartSearchError::Config(_) => ErrorClass::Validation,
            SmartSearchError::FilterNotFound(_) => ErrorClass::Identity,
            SmartSearchError::Precondition { .. } | SmartSearchError::SessionClosed => {
                ErrorClass::Precondition
            }
            SmartSearchError::Io(_)
            | SmartSearchError::Serialization(_)
            | SmartSearchError::Store(_) => ErrorClass::Persistence,
        }
    }

    pub(crate) fn invalid(kind: FilterKind, reason: impl Into<String>) -> Self {
        SmartSearchError::InvalidConfig {
            kind,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SmartSearchError>;
