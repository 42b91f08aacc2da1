//! Error types for the advisory core.
//!
//! Each variant carries a stable error code (SCREAMING_SNAKE_CASE) that is
//! included in the Display output and accessible via [`AdvisoryError::code()`].

/// Stable error codes for programmatic error handling.
pub mod error_codes {
    /// No backend endpoint is reachable, or the transport failed.
    pub const NETWORK_UNAVAILABLE: &str = "NETWORK_UNAVAILABLE";

    /// The backend answered with a non-success HTTP status.
    pub const REMOTE_ERROR: &str = "REMOTE_ERROR";

    /// A platform voice capability is missing.
    pub const UNSUPPORTED_CAPABILITY: &str = "UNSUPPORTED_CAPABILITY";

    /// Microphone access was refused.
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";

    /// The query was rejected before dispatch.
    pub const INVALID_INPUT: &str = "INVALID_INPUT";

    /// A voice action conflicts with the active voice session.
    pub const VOICE_BUSY: &str = "VOICE_BUSY";

    /// The requested action is not valid in the current state.
    pub const INVALID_STATE: &str = "INVALID_STATE";

    /// Invalid or unreadable configuration.
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

    /// Local I/O failure.
    pub const IO_ERROR: &str = "IO_ERROR";
}

/// Which voice capability is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Platform speech recognition (capture).
    SpeechRecognition,
    /// Platform speech synthesis (playback).
    SpeechSynthesis,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SpeechRecognition => write!(f, "speech recognition"),
            Self::SpeechSynthesis => write!(f, "speech synthesis"),
        }
    }
}

/// Errors produced by the advisory core.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    /// No endpoint reachable, connection refused, or request timed out.
    #[error("[{}] {}", error_codes::NETWORK_UNAVAILABLE, .0)]
    NetworkUnavailable(String),

    /// Backend reachable but answered with an error status.
    #[error("[{}] HTTP {status}: {message}", error_codes::REMOTE_ERROR)]
    RemoteError {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Truncated response body.
        message: String,
    },

    /// Voice capability absent in this runtime.
    #[error("[{}] {} is not available", error_codes::UNSUPPORTED_CAPABILITY, .0)]
    UnsupportedCapability(Capability),

    /// Microphone access refused.
    #[error("[{}] microphone access was denied", error_codes::PERMISSION_DENIED)]
    PermissionDenied,

    /// Empty query, or an image that cannot be sent.
    #[error("[{}] {}", error_codes::INVALID_INPUT, .0)]
    InvalidInput(String),

    /// Capture and playback would overlap.
    #[error("[{}] {}", error_codes::VOICE_BUSY, .0)]
    VoiceBusy(String),

    /// Action not valid in the current state.
    #[error("[{}] {}", error_codes::INVALID_STATE, .0)]
    InvalidState(String),

    /// Invalid or unreadable configuration.
    #[error("[{}] {}", error_codes::CONFIG_INVALID, .0)]
    Config(String),

    /// I/O error.
    #[error("[{}] {}", error_codes::IO_ERROR, .0)]
    Io(#[from] std::io::Error),
}

impl AdvisoryError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NetworkUnavailable(_) => error_codes::NETWORK_UNAVAILABLE,
            Self::RemoteError { .. } => error_codes::REMOTE_ERROR,
            Self::UnsupportedCapability(_) => error_codes::UNSUPPORTED_CAPABILITY,
            Self::PermissionDenied => error_codes::PERMISSION_DENIED,
            Self::InvalidInput(_) => error_codes::INVALID_INPUT,
            Self::VoiceBusy(_) => error_codes::VOICE_BUSY,
            Self::InvalidState(_) => error_codes::INVALID_STATE,
            Self::Config(_) => error_codes::CONFIG_INVALID,
            Self::Io(_) => error_codes::IO_ERROR,
        }
    }

    /// Returns true if a failed remote call with this error should be
    /// answered by the local fallback responder.
    pub fn triggers_fallback(&self) -> bool {
        matches!(
            self,
            Self::NetworkUnavailable(_) | Self::RemoteError { .. }
        )
    }

    /// Returns true if this error means the bound endpoint stopped answering
    /// at the transport level, as opposed to answering with an error status.
    pub fn is_connection_loss(&self) -> bool {
        matches!(self, Self::NetworkUnavailable(_))
    }
}

impl From<reqwest::Error> for AdvisoryError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::RemoteError {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        if err.is_timeout() {
            Self::NetworkUnavailable(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::NetworkUnavailable(format!("connection failed: {err}"))
        } else {
            Self::NetworkUnavailable(format!("transport error: {err}"))
        }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AdvisoryError>;
