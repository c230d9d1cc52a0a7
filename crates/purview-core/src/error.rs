//! Unified application error types for purview-automation.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The collection matches neither an id nor any friendly name.
    NotFound,
    /// Several collections share the friendly name and no id was given.
    AmbiguousName,
    /// The service answered 403 for the caller's credential.
    PermissionDenied,
    /// A structural precondition failed (e.g. deleting a non-leaf collection).
    Precondition,
    /// The service answered with a non-success status or the request failed.
    Transport,
    /// The id generator could not find a free id within its retry budget.
    ExhaustedRetries,
    /// Acquiring a bearer token failed.
    Authentication,
    /// Input validation failed.
    Validation,
    /// The remote state changed underneath a pending write.
    Conflict,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::AmbiguousName => write!(f, "AMBIGUOUS_NAME"),
            Self::PermissionDenied => write!(f, "PERMISSION_DENIED"),
            Self::Precondition => write!(f, "PRECONDITION"),
            Self::Transport => write!(f, "TRANSPORT"),
            Self::ExhaustedRetries => write!(f, "EXHAUSTED_RETRIES"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// One collection sharing an ambiguous friendly name.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NameCandidate {
    /// The collection id to pass back in to disambiguate.
    pub id: String,
    /// The shared friendly name.
    pub friendly_name: String,
    /// Friendly name of the parent collection, if there is one.
    pub parent_friendly_name: Option<String>,
}

impl fmt::Display for NameCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "('{}', '{}', parent: '{}')",
            self.id,
            self.friendly_name,
            self.parent_friendly_name.as_deref().unwrap_or("<none>")
        )
    }
}

/// The unified application error used throughout purview-automation.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. Ambiguous-name errors additionally carry
/// the candidate list so callers can re-invoke with an unambiguous id.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Candidates for an [`ErrorKind::AmbiguousName`] error; empty otherwise.
    pub candidates: Vec<NameCandidate>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            candidates: Vec::new(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            candidates: Vec::new(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an ambiguous-name error listing every candidate.
    pub fn ambiguous(name: &str, candidates: Vec<NameCandidate>) -> Self {
        let listing = candidates
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        let message = format!(
            "Multiple collections exist with the friendly name '{name}'. \
             Re-enter one of the ids below instead:\n{listing}\n\
             To use the collection whose id is literally '{name}', set force_actual_name."
        );
        Self {
            kind: ErrorKind::AmbiguousName,
            message,
            candidates,
            source: None,
        }
    }

    /// Create a permission-denied error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionDenied, message)
    }

    /// Create a structural-precondition error.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Precondition, message)
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create an exhausted-retries error.
    pub fn exhausted_retries(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExhaustedRetries, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Prefix the message with extra context, keeping kind and candidates.
    pub fn context(mut self, context: impl fmt::Display) -> Self {
        self.message = format!("{context}: {}", self.message);
        self
    }

    /// Whether this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            candidates: self.candidates.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
