// Session-scoped credential storage

use std::sync::Arc;
use tokio::sync::RwLock;

/// Holds the bearer credential for the lifetime of the process
///
/// Clones share the same slot, so the transport and the session manager
/// observe each other's writes. Nothing is persisted to disk.
#[derive(Clone, Default)]
pub struct CredentialStore {
    credential: Arc<RwLock<Option<String>>>,
}

impl CredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a previously issued credential
    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            credential: Arc::new(RwLock::new(Some(credential.into()))),
        }
    }

    pub async fn get(&self) -> Option<String> {
        self.credential.read().await.clone()
    }

    pub async fn set(&self, credential: impl Into<String>) {
        let mut slot = self.credential.write().await;
        *slot = Some(credential.into());
    }

    pub async fn clear(&self) {
        let mut slot = self.credential.write().await;
        *slot = None;
    }

    pub async fn is_present(&self) -> bool {
        self.credential.read().await.is_some()
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

/// Short, log-safe prefix of a credential
pub fn mask(credential: &str) -> String {
    let prefix: String = credential.chars().take(8).collect();
    format!("{}...", prefix)
}
