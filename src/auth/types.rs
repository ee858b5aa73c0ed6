// Authentication types

use serde::{Deserialize, Serialize};

/// Lifecycle of the admin session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No credential, or the stored one was rejected
    Unauthenticated,
    /// A stored credential exists but has not been validated yet
    Checking,
    /// Profile check or login succeeded
    Authenticated,
}

impl SessionState {
    pub fn is_authenticated(self) -> bool {
        self == SessionState::Authenticated
    }
}

/// Login request body
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Login response body
#[derive(Deserialize)]
pub struct LoginResponse {
    pub token: Option<String>,
}
