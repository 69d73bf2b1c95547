use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Connection parameters for one downstream service (url, token, pool size..).
pub type ServiceParams = BTreeMap<String, Value>;

/// Per-tenant credential material keyed by logical service name.
///
/// The core treats the contents as opaque: bundles are created out-of-band or
/// by the fallback provider, read during one request, and always replaced
/// wholesale, never mutated in place. Backed by `BTreeMap` so the canonical
/// JSON encoding is key-ordered and byte-stable across round-trips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialBundle(BTreeMap<String, ServiceParams>);

impl CredentialBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parameters for a logical service, when the bundle carries them.
    pub fn service(&self, name: &str) -> Option<&ServiceParams> {
        self.0.get(name)
    }

    pub fn insert_service(&mut self, name: impl Into<String>, params: ServiceParams) {
        self.0.insert(name.into(), params);
    }

    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Canonical byte encoding used for encryption: key-ordered JSON.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|err| Error::Encoding(err.to_string()))
    }

    /// Inverse of [`CredentialBundle::to_canonical_bytes`].
    pub fn from_canonical_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|err| Error::Encoding(err.to_string()))
    }
}
