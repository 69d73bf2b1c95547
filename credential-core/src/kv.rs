use crate::errors::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[cfg(feature = "valkey")]
pub mod valkey;
#[cfg(feature = "valkey")]
pub use valkey::ValkeyStore;

/// Byte-oriented key-value backend the encrypted store persists records to.
///
/// Implementations must give per-key read-after-write consistency: a `put`
/// for a key is visible to any `get` for that key issued after the `put`
/// completes. No cross-key ordering is assumed. Transport failures surface as
/// [`crate::Error::StoreTransport`]; no retry happens at this layer.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the raw record for a key. Absent keys are `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Persist a record, replacing any prior value for the key.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;
}

#[async_trait]
impl<T> KeyValueStore for Arc<T>
where
    T: KeyValueStore + ?Sized,
{
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        (**self).put(key, value).await
    }
}

#[async_trait]
impl<T> KeyValueStore for Box<T>
where
    T: KeyValueStore + ?Sized,
{
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        (**self).put(key, value).await
    }
}

/// In-process backend for development and tests.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.state.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.state.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_after_write_per_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").await.unwrap(), None);

        store.put("a", b"one".to_vec()).await.unwrap();
        store.put("b", b"two".to_vec()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(b"one".to_vec()));

        store.put("a", b"three".to_vec()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(b"three".to_vec()));
        assert_eq!(store.get("b").await.unwrap(), Some(b"two".to_vec()));
    }
}
