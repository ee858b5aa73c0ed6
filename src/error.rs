// Error handling module
// Defines the error taxonomy shared by transport, session and synchronizer

use std::time::Duration;
use thiserror::Error;

/// Coarse classification of an [`AdminError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Timeout,
    Cancelled,
    Auth,
    Validation,
    Mutation,
    Decode,
    Config,
    Internal,
}

/// Errors that can occur while talking to the admin API
#[derive(Error, Debug)]
pub enum AdminError {
    /// Transport could not complete the request
    #[error("Network error: {0}")]
    Network(String),

    /// The per-call timeout elapsed before the response was fully read
    #[error("Request timed out after {after:?}")]
    Timeout { after: Duration },

    /// The caller cancelled the request
    #[error("Request cancelled")]
    Cancelled,

    /// Login or profile check rejected, or no credential for a gated call
    #[error("Authentication failed: {status} - {message}")]
    Auth { status: u16, message: String },

    /// A required field is missing; raised before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Non-success status on list/create/update/delete
    #[error("Request rejected by server: {status} - {message}")]
    Mutation { status: u16, message: String },

    /// Success status but the body was not in the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AdminError {
    /// Auth error raised locally when no credential is stored
    pub fn missing_credential() -> Self {
        AdminError::Auth {
            status: 401,
            message: "no credential stored".to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AdminError::Network(_) => ErrorKind::Network,
            AdminError::Timeout { .. } => ErrorKind::Timeout,
            AdminError::Cancelled => ErrorKind::Cancelled,
            AdminError::Auth { .. } => ErrorKind::Auth,
            AdminError::Validation(_) => ErrorKind::Validation,
            AdminError::Mutation { .. } => ErrorKind::Mutation,
            AdminError::Decode(_) => ErrorKind::Decode,
            AdminError::Config(_) => ErrorKind::Config,
            AdminError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether the error came from the transport rather than the server's answer
    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Network | ErrorKind::Timeout | ErrorKind::Cancelled
        )
    }
}

/// Result type alias for admin operations
pub type Result<T> = std::result::Result<T, AdminError>;
