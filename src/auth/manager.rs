use reqwest::Method;
use std::sync::Arc;

use super::store::{mask, CredentialStore};
use super::types::{LoginRequest, LoginResponse, SessionState};
use crate::error::AdminError;
use crate::http_client::{ensure_success, AdminHttpClient, RequestOptions};

const LOGIN_PATH: &str = "/admin/login";
const PROFILE_PATH: &str = "/admin/profile";

/// Session manager
/// Validates stored credentials, exchanges email/password for a token and
/// tracks whether the console is logged in
pub struct SessionManager {
    /// Shared transport
    http_client: Arc<AdminHttpClient>,

    /// Same store the transport reads from
    credentials: CredentialStore,

    /// Current lifecycle state
    state: SessionState,

    /// Drop the stored credential when the profile check rejects it
    clear_stale_credential: bool,
}

impl SessionManager {
    /// Create a session manager; starts in `Checking` when a credential is already stored
    pub async fn new(http_client: Arc<AdminHttpClient>, clear_stale_credential: bool) -> Self {
        let credentials = http_client.credentials().clone();
        let state = if credentials.is_present().await {
            SessionState::Checking
        } else {
            SessionState::Unauthenticated
        };

        Self {
            http_client,
            credentials,
            state,
            clear_stale_credential,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// Validate the stored credential against the profile endpoint
    pub async fn check_session(
        &mut self,
        options: &RequestOptions,
    ) -> Result<SessionState, AdminError> {
        let Some(token) = self.credentials.get().await else {
            self.state = SessionState::Unauthenticated;
            return Ok(self.state);
        };

        self.state = SessionState::Checking;
        tracing::debug!(token = %mask(&token), "Checking stored credential");

        let result = self
            .http_client
            .request(Method::GET, PROFILE_PATH, None, options.clone())
            .await
            .and_then(|response| {
                ensure_success(response, |status, message| AdminError::Auth { status, message })
            });

        match result {
            Ok(_) => {
                self.state = SessionState::Authenticated;
                tracing::info!("Stored credential accepted, session restored");
                Ok(self.state)
            }
            Err(e) => {
                self.state = SessionState::Unauthenticated;
                tracing::warn!(error = %e, "Profile check failed");

                if self.clear_stale_credential && matches!(e, AdminError::Auth { .. }) {
                    tracing::info!("Clearing rejected credential");
                    self.credentials.clear().await;
                }

                Err(e)
            }
        }
    }

    /// Exchange email and password for a bearer credential
    ///
    /// On failure the session state is left exactly as it was.
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
        options: &RequestOptions,
    ) -> Result<(), AdminError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AdminError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let body = serde_json::to_value(LoginRequest { email, password })
            .map_err(|e| AdminError::Internal(e.into()))?;

        let response = self
            .http_client
            .request_unauthenticated(Method::POST, LOGIN_PATH, Some(body), options.clone())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Login request failed"))?;

        let response = ensure_success(response, |status, message| AdminError::Auth {
            status,
            message,
        })
        .inspect_err(|e| tracing::error!(error = %e, "Login rejected"))?;

        let data: LoginResponse = response
            .json()
            .map_err(|e| AdminError::Decode(format!("login response: {}", e)))?;

        let token = data
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AdminError::Decode("login response does not contain token".to_string()))?;

        tracing::info!(token = %mask(&token), "Login successful");
        self.credentials.set(token).await;
        self.state = SessionState::Authenticated;

        Ok(())
    }

    /// Forget the credential and return to the login state
    pub async fn logout(&mut self) {
        self.credentials.clear().await;
        self.state = SessionState::Unauthenticated;
        tracing::info!("Logged out");
    }
}
