pub mod auth;
pub mod store;

use std::sync::Arc;

use credential_gateway::auth::TokenVerifier;
use credential_gateway::AppState;
use credential_core::{CredentialResolver, CredentialStore, EncryptionKey, KeyValueStore};

use auth::TestAuth;

/// Assemble gateway state over an arbitrary backend, the dependency-injection
/// path the production bootstrap also uses.
pub fn build_state(auth: &TestAuth, backend: Box<dyn KeyValueStore>, key: &EncryptionKey) -> AppState {
    let store = CredentialStore::new(backend, key);
    AppState::new(
        Arc::new(CredentialResolver::new(store)),
        Arc::new(TokenVerifier::new(&auth.auth_config())),
    )
}
