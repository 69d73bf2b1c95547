use std::time::{Duration, SystemTime, UNIX_EPOCH};

use credential_gateway::config::AuthConfig;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{Map, Value};

/// Mints HS256 tokens the gateway's verifier accepts.
pub struct TestAuth {
    secret: String,
    issuer: String,
    audience: String,
}

impl TestAuth {
    pub fn new() -> Self {
        Self {
            secret: "test-signing-secret".to_string(),
            issuer: "https://gateway.test/issuer".to_string(),
            audience: "credential-gateway".to_string(),
        }
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            secret: self.secret.clone(),
            issuer: self.issuer.clone(),
            audience: self.audience.clone(),
        }
    }

    /// Token with the given extra claims and a one-hour lifetime.
    pub fn token(&self, claims: &[(&str, Value)]) -> String {
        self.token_with_ttl(claims, 3600)
    }

    #[allow(dead_code)]
    pub fn expired_token(&self, claims: &[(&str, Value)]) -> String {
        self.token_with_ttl(claims, -60)
    }

    pub fn token_with_ttl(&self, claims: &[(&str, Value)], ttl_secs: i64) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|_| Duration::from_secs(0))
            .as_secs() as i64;

        let mut payload = Map::new();
        payload.insert("iss".into(), Value::from(self.issuer.clone()));
        payload.insert("aud".into(), Value::from(self.audience.clone()));
        payload.insert("exp".into(), Value::from(now.saturating_add(ttl_secs)));
        for (name, value) in claims {
            payload.insert(name.to_string(), value.clone());
        }

        encode(
            &Header::default(),
            &Value::Object(payload),
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("failed to encode test token")
    }
}
