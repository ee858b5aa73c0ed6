// Authentication module
// Credential storage and the admin session lifecycle

mod manager;
mod store;
mod types;

pub use manager::SessionManager;
pub use store::{mask, CredentialStore};
pub use types::SessionState;
