use anyhow::{anyhow, Context, Result};
use credential_core::{EncryptionKey, KeyValueStore, MemoryStore};
use std::net::SocketAddr;

/// Gateway configuration, read from the environment once at startup.
/// Validation is eager and process-fatal: a gateway that cannot decrypt its
/// credential records must not come up at all.
#[derive(Clone)]
pub struct GatewayConfig {
    pub bind: SocketAddr,
    pub encryption_key: EncryptionKey,
    pub auth: AuthConfig,
    pub store: StoreConfig,
}

#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret shared with the token issuer.
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Backend selector: `memory` or `valkey`.
    pub kind: String,
    pub host: String,
    pub port: u16,
    pub db: u32,
}

impl StoreConfig {
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        let bind = std::env::var("GATEWAY__BIND_ADDRESS")
            .unwrap_or_else(|_| "0.0.0.0:8000".into())
            .parse()
            .context("GATEWAY__BIND_ADDRESS is not a valid socket address")?;

        let key_b64 = std::env::var("CREDENTIALS_ENCRYPTION_KEY")
            .context("CREDENTIALS_ENCRYPTION_KEY is required")?;
        let encryption_key = EncryptionKey::from_base64(&key_b64)
            .context("CREDENTIALS_ENCRYPTION_KEY is not a valid base64 AES-256 key")?;

        let auth = AuthConfig {
            secret: std::env::var("AUTH_JWT_SECRET").context("AUTH_JWT_SECRET is required")?,
            issuer: std::env::var("AUTH_JWT_ISS").context("AUTH_JWT_ISS is required")?,
            audience: std::env::var("AUTH_JWT_AUD").context("AUTH_JWT_AUD is required")?,
        };

        let store = StoreConfig {
            kind: std::env::var("CREDENTIALS_BACKEND").unwrap_or_else(|_| "memory".into()),
            host: std::env::var("VALKEY_HOST").unwrap_or_else(|_| "localhost".into()),
            port: std::env::var("VALKEY_PORT")
                .unwrap_or_else(|_| "6379".into())
                .parse()
                .context("VALKEY_PORT is not a valid port")?,
            db: std::env::var("VALKEY_DB")
                .unwrap_or_else(|_| "0".into())
                .parse()
                .context("VALKEY_DB is not a valid database index")?,
        };

        Ok(Self {
            bind,
            encryption_key,
            auth,
            store,
        })
    }
}

/// Construct the key-value backend named by the configuration.
pub async fn build_backend(config: &StoreConfig) -> Result<Box<dyn KeyValueStore>> {
    match config.kind.as_str() {
        "memory" => Ok(Box::new(MemoryStore::new())),
        "valkey" => {
            #[cfg(feature = "valkey")]
            {
                let store =
                    credential_core::kv::ValkeyStore::connect(&config.url(), "credentials")
                        .await
                        .context("failed to connect to valkey")?;
                Ok(Box::new(store))
            }

            #[cfg(not(feature = "valkey"))]
            {
                anyhow::bail!("valkey backend requested but the valkey feature is not enabled");
            }
        }
        other => Err(anyhow!("unsupported credentials backend `{other}`")),
    }
}
