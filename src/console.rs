// Admin console
// Sequences the session lifecycle with the record synchronizer

use std::sync::Arc;

use crate::auth::{SessionManager, SessionState};
use crate::error::AdminError;
use crate::http_client::{AdminHttpClient, RequestOptions};
use crate::models::ChargingPoint;
use crate::sync::{Editor, RecordSynchronizer};

/// Session plus record cache, as seen by the presentation layer
pub struct AdminConsole {
    http_client: Arc<AdminHttpClient>,
    session: SessionManager,
    records: RecordSynchronizer,
}

impl AdminConsole {
    pub async fn new(http_client: Arc<AdminHttpClient>, clear_stale_credential: bool) -> Self {
        let session = SessionManager::new(http_client.clone(), clear_stale_credential).await;
        let records = RecordSynchronizer::new(http_client.clone());

        Self {
            http_client,
            session,
            records,
        }
    }

    /// Validate any stored credential and load records if it is accepted
    ///
    /// A load failure after an accepted credential is still an error; check
    /// `is_authenticated()` to tell it apart from a rejected session.
    pub async fn start(&mut self, options: &RequestOptions) -> Result<SessionState, AdminError> {
        tracing::info!(api = %self.http_client.base_url(), "Checking stored session");
        let state = self.session.check_session(options).await?;
        if state.is_authenticated() {
            self.records.reload(options).await?;
        }
        Ok(state)
    }

    /// Log in and load the initial record list
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
        options: &RequestOptions,
    ) -> Result<(), AdminError> {
        self.session.login(email, password, options).await?;
        self.records.reload(options).await?;
        Ok(())
    }

    /// Clear the credential and discard every piece of local state
    pub async fn logout(&mut self) {
        self.session.logout().await;
        self.records = RecordSynchronizer::new(self.http_client.clone());
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn records(&self) -> &[ChargingPoint] {
        self.records.records()
    }

    pub fn editor(&self) -> &Editor {
        self.records.editor()
    }

    pub fn synchronizer_mut(&mut self) -> &mut RecordSynchronizer {
        &mut self.records
    }
}
