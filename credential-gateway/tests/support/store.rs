use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use credential_core::{Error, KeyValueStore, MemoryStore, Result};

/// In-memory backend that counts calls, for asserting the store is never
/// consulted on short-circuited invocations.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    gets: AtomicUsize,
    puts: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn put_calls(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

/// Backend whose reads always fail with a transport error, simulating an
/// unreachable key-value service.
#[derive(Default)]
pub struct UnreachableStore;

impl UnreachableStore {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KeyValueStore for UnreachableStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(Error::StoreTransport("connection refused".into()))
    }

    async fn put(&self, _key: &str, _value: Vec<u8>) -> Result<()> {
        Err(Error::StoreTransport("connection refused".into()))
    }
}

#[async_trait]
impl KeyValueStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, value).await
    }
}
