use std::sync::Arc;

use crate::auth::TokenVerifier;
use credential_core::{CredentialResolver, KeyValueStore};

pub type SharedResolver = Arc<CredentialResolver<Box<dyn KeyValueStore>>>;
pub type SharedVerifier = Arc<TokenVerifier>;

#[derive(Clone)]
pub struct AppState {
    pub resolver: SharedResolver,
    pub verifier: SharedVerifier,
}

impl AppState {
    pub fn new(resolver: SharedResolver, verifier: SharedVerifier) -> Self {
        Self { resolver, verifier }
    }
}
