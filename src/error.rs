//! Error types for the story-video client.

use thiserror::Error;

/// Result type alias for studio operations.
pub type StudioResult<T> = Result<T, StudioError>;

/// Errors that can occur while configuring, submitting or tracking a generation.
#[derive(Error, Debug)]
pub enum StudioError {
    /// Local pre-submission guard failed (empty topic, missing template, ...).
    /// No network call was made.
    #[error("{0}")]
    ValidationRejected(String),

    /// The initial generation POST failed.
    #[error("Submission failed{}: {message}", status_suffix(.status))]
    SubmissionFailed {
        status: Option<u16>,
        message: String,
    },

    /// A progress poll failed at the HTTP level.
    #[error("Progress poll failed: {0}")]
    PollFailed(String),

    /// The backend reported an error inside an otherwise successful progress response.
    #[error("{0}")]
    BackendReported(String),

    /// Saving a finished video to the gallery failed.
    #[error("Gallery persistence failed: {0}")]
    PersistenceFailed(String),

    /// Any other non-2xx response from an auxiliary endpoint.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// An option id that is not part of the closed option set.
    #[error("Unknown {kind} option: {value}")]
    UnknownOption { kind: &'static str, value: String },

    /// Transport-level HTTP error.
    #[cfg(feature = "client")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid or unreadable settings.
    #[error("Configuration error: {0}")]
    Config(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

impl StudioError {
    /// Creates a ValidationRejected error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationRejected(msg.into())
    }

    /// Creates a SubmissionFailed error.
    pub fn submission(status: Option<u16>, msg: impl Into<String>) -> Self {
        Self::SubmissionFailed {
            status,
            message: msg.into(),
        }
    }

    /// Creates a PollFailed error.
    pub fn poll(msg: impl Into<String>) -> Self {
        Self::PollFailed(msg.into())
    }

    /// Creates a BackendReported error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::BackendReported(msg.into())
    }

    /// Creates a PersistenceFailed error.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::PersistenceFailed(msg.into())
    }

    /// Creates an Api error.
    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: msg.into(),
        }
    }

    /// Creates an UnknownOption error.
    pub fn unknown_option(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownOption {
            kind,
            value: value.into(),
        }
    }

    /// Creates a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Message suitable for showing to the user verbatim.
    ///
    /// Submission and backend errors carry the server's own text, so only that
    /// part is returned for them.
    pub fn user_message(&self) -> String {
        match self {
            Self::SubmissionFailed { message, .. } => message.clone(),
            Self::BackendReported(msg) | Self::ValidationRejected(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// True for errors raised before any network traffic.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationRejected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_display_includes_status() {
        let err = StudioError::submission(Some(500), "boom");
        assert_eq!(err.to_string(), "Submission failed (HTTP 500): boom");
        assert_eq!(err.user_message(), "boom");

        let err = StudioError::submission(None, "connection refused");
        assert_eq!(err.to_string(), "Submission failed: connection refused");
    }

    #[test]
    fn test_validation_is_verbatim() {
        let err = StudioError::validation("Please enter a story topic");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Please enter a story topic");
    }

    #[test]
    fn test_backend_error_is_verbatim() {
        let err = StudioError::backend("Out of VRAM while rendering scene 4");
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Out of VRAM while rendering scene 4");
        assert_eq!(err.user_message(), "Out of VRAM while rendering scene 4");
    }
}
