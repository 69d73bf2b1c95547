use crate::bundle::CredentialBundle;
use crate::errors::Result;
use crate::fallback::default_bundle;
use crate::identity::TenantId;
use crate::kv::KeyValueStore;
use crate::store::CredentialStore;
use tracing::debug;

/// The single seam deciding bundle provenance: a stored record wins, an
/// absent one falls back to the demo bundle. Store failures (transport or
/// corruption) propagate unchanged; in particular a corrupt record is never
/// downgraded to the fallback.
pub struct CredentialResolver<S> {
    store: CredentialStore<S>,
}

impl<S: KeyValueStore> CredentialResolver<S> {
    pub fn new(store: CredentialStore<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CredentialStore<S> {
        &self.store
    }

    /// Resolve the credentials one invocation will run with. The fallback is
    /// synthesized per call and never written back to the store.
    pub async fn resolve(&self, tenant: &TenantId) -> Result<CredentialBundle> {
        match self.store.get(tenant).await? {
            Some(bundle) => {
                debug!(tenant = %tenant, "resolved stored credentials");
                Ok(bundle)
            }
            None => {
                debug!(tenant = %tenant, "no stored credentials, using fallback bundle");
                Ok(default_bundle())
            }
        }
    }
}
