use crate::bundle::CredentialBundle;
use crate::errors::{Error, Result};
use crate::identity::TenantId;
use crate::kv::KeyValueStore;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;
use std::fmt;

const STORAGE_KEY_PREFIX: &str = "customer:";
const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// AES-256-GCM key material sourced from configuration.
///
/// Parsing validates the format eagerly so a malformed key aborts process
/// startup instead of surfacing on first use.
#[derive(Clone)]
pub struct EncryptionKey([u8; KEY_LEN]);

impl EncryptionKey {
    /// Parse a standard-base64 encoding of exactly 32 bytes of key material.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let raw = STANDARD
            .decode(encoded.trim())
            .map_err(|err| Error::InvalidKey(err.to_string()))?;
        let raw: [u8; KEY_LEN] = raw.try_into().map_err(|raw: Vec<u8>| {
            Error::InvalidKey(format!("expected {KEY_LEN} bytes, got {}", raw.len()))
        })?;
        Ok(Self(raw))
    }

    /// Fresh random key, for tests and local development.
    pub fn generate() -> Self {
        let mut raw = [0u8; KEY_LEN];
        rand::rng().fill_bytes(&mut raw);
        Self(raw)
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(..)")
    }
}

/// Encrypted credential store: a key-value backend wrapped with AES-256-GCM.
///
/// Persisted record layout is `nonce || ciphertext+tag` with a fresh random
/// nonce per write. Decrypted bundles are never cached beyond the call that
/// requested them.
pub struct CredentialStore<S> {
    store: S,
    cipher: Aes256Gcm,
}

impl<S: KeyValueStore> CredentialStore<S> {
    pub fn new(store: S, key: &EncryptionKey) -> Self {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.0));
        Self { store, cipher }
    }

    /// Deterministic storage key for a tenant. Distinct tenants map to
    /// distinct keys because the tenant id is appended verbatim.
    pub fn storage_key(tenant: &TenantId) -> String {
        format!("{STORAGE_KEY_PREFIX}{tenant}")
    }

    /// Fetch and decrypt the tenant's bundle. An absent record is `Ok(None)`;
    /// a present record that fails decryption, integrity, or decoding is
    /// `StoreCorrupted` and is never reported as absent.
    pub async fn get(&self, tenant: &TenantId) -> Result<Option<CredentialBundle>> {
        let Some(record) = self.store.get(&Self::storage_key(tenant)).await? else {
            return Ok(None);
        };

        let plaintext = self.open(&record)?;
        let bundle =
            CredentialBundle::from_canonical_bytes(&plaintext).map_err(|_| Error::StoreCorrupted)?;
        Ok(Some(bundle))
    }

    /// Encrypt and persist a bundle, replacing any prior record for the
    /// tenant. Not on the request path; used by provisioning and tests.
    pub async fn put(&self, tenant: &TenantId, bundle: &CredentialBundle) -> Result<()> {
        let plaintext = bundle.to_canonical_bytes()?;
        let record = self.seal(&plaintext)?;
        self.store.put(&Self::storage_key(tenant), record).await
    }

    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| Error::Crypto("failed to encrypt credential record".into()))?;

        let mut record = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        record.extend_from_slice(&nonce);
        record.extend_from_slice(&ciphertext);
        Ok(record)
    }

    fn open(&self, record: &[u8]) -> Result<Vec<u8>> {
        if record.len() <= NONCE_LEN {
            return Err(Error::StoreCorrupted);
        }
        let (nonce, ciphertext) = record.split_at(NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| Error::StoreCorrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn tenant(id: &str) -> TenantId {
        TenantId::new(id).expect("tenant id")
    }

    fn sample_bundle(marker: &str) -> CredentialBundle {
        let mut bundle = CredentialBundle::new();
        bundle.insert_service(
            "api_service",
            [
                ("url".to_string(), json!(format!("https://{marker}.example.com"))),
                ("token".to_string(), json!(marker)),
            ]
            .into_iter()
            .collect(),
        );
        bundle
    }

    fn store_over(raw: Arc<MemoryStore>) -> CredentialStore<Arc<MemoryStore>> {
        CredentialStore::new(raw, &EncryptionKey::generate())
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = store_over(Arc::new(MemoryStore::new()));
        let tenant = tenant("acme");
        let bundle = sample_bundle("acme");

        store.put(&tenant, &bundle).await.expect("put");
        let fetched = store.get(&tenant).await.expect("get").expect("present");
        assert_eq!(fetched, bundle);
    }

    #[tokio::test]
    async fn absent_record_is_none_not_error() {
        let store = store_over(Arc::new(MemoryStore::new()));
        assert_eq!(store.get(&tenant("nobody")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn tampered_ciphertext_is_corruption() {
        let raw = Arc::new(MemoryStore::new());
        let store = store_over(raw.clone());
        let tenant = tenant("acme");

        store.put(&tenant, &sample_bundle("acme")).await.unwrap();

        let key = CredentialStore::<Arc<MemoryStore>>::storage_key(&tenant);
        let mut record = raw.get(&key).await.unwrap().expect("raw record");
        // Flip a byte past the nonce so the tag check must fail.
        let last = record.len() - 1;
        record[last] ^= 0xFF;
        raw.put(&key, record).await.unwrap();

        assert_eq!(store.get(&tenant).await, Err(Error::StoreCorrupted));
    }

    #[tokio::test]
    async fn truncated_record_is_corruption() {
        let raw = Arc::new(MemoryStore::new());
        let store = store_over(raw.clone());
        let tenant = tenant("acme");

        let key = CredentialStore::<Arc<MemoryStore>>::storage_key(&tenant);
        raw.put(&key, vec![0u8; NONCE_LEN]).await.unwrap();

        assert_eq!(store.get(&tenant).await, Err(Error::StoreCorrupted));
    }

    #[tokio::test]
    async fn wrong_key_is_corruption_not_absence() {
        let raw = Arc::new(MemoryStore::new());
        let writer = CredentialStore::new(raw.clone(), &EncryptionKey::generate());
        let reader = CredentialStore::new(raw, &EncryptionKey::generate());
        let tenant = tenant("acme");

        writer.put(&tenant, &sample_bundle("acme")).await.unwrap();
        assert_eq!(reader.get(&tenant).await, Err(Error::StoreCorrupted));
    }

    #[tokio::test]
    async fn tenants_occupy_disjoint_keys() {
        let store = store_over(Arc::new(MemoryStore::new()));
        let first = tenant("c1");
        let second = tenant("c-1");

        assert_ne!(
            CredentialStore::<Arc<MemoryStore>>::storage_key(&first),
            CredentialStore::<Arc<MemoryStore>>::storage_key(&second)
        );

        store.put(&first, &sample_bundle("one")).await.unwrap();
        store.put(&second, &sample_bundle("two")).await.unwrap();

        let fetched = store.get(&first).await.unwrap().unwrap();
        assert_eq!(fetched, sample_bundle("one"));
    }

    #[test]
    fn key_parsing_validates_eagerly() {
        assert!(matches!(
            EncryptionKey::from_base64("not base64!!"),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(
            EncryptionKey::from_base64(&STANDARD.encode([0u8; 16])),
            Err(Error::InvalidKey(_))
        ));

        let key = EncryptionKey::generate();
        assert!(EncryptionKey::from_base64(&key.to_base64()).is_ok());
        assert_eq!(format!("{key:?}"), "EncryptionKey(..)");
    }
}
