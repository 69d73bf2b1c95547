use crate::errors::{Error, Result};
use crate::kv::KeyValueStore;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::Arc;

/// Valkey/Redis-backed store. Keys are prefixed with a namespace so several
/// deployments can share one instance.
#[derive(Clone)]
pub struct ValkeyStore {
    manager: ConnectionManager,
    namespace: Arc<String>,
}

impl ValkeyStore {
    /// Connect to `redis://host:port/db`. Connection management (reconnects,
    /// transport timeouts) is the manager's policy; failures surface as
    /// [`Error::StoreTransport`].
    pub async fn connect(url: &str, namespace: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|err| Error::StoreTransport(format!("valkey client: {err}")))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|err| Error::StoreTransport(format!("valkey connect: {err}")))?;
        Ok(Self {
            manager,
            namespace: Arc::new(namespace.into()),
        })
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

#[async_trait]
impl KeyValueStore for ValkeyStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.manager.clone();
        conn.get(self.namespaced(key))
            .await
            .map_err(|err| Error::StoreTransport(format!("valkey get: {err}")))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut conn = self.manager.clone();
        conn.set::<_, _, ()>(self.namespaced(key), value)
            .await
            .map_err(|err| Error::StoreTransport(format!("valkey set: {err}")))
    }
}
