use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header::AUTHORIZATION, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ring::hmac;
use serde::Deserialize;
use serde_json::Value;

use crate::config::AuthConfig;
use crate::error::AppError;
use crate::state::AppState;
use credential_core::AccessToken;

#[derive(Debug, Deserialize)]
struct JwtHeaderParts {
    alg: String,
}

/// Verifies HS256 bearer tokens and hands the claim set to the rest of the
/// pipeline as an [`AccessToken`]. This is the authentication layer the
/// credential core treats as a collaborator; everything past this point reads
/// claims without re-verifying anything.
pub struct TokenVerifier {
    key: hmac::Key,
    issuer: String,
    audience: String,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    pub fn verify(&self, token: &str) -> Result<AccessToken, AppError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::unauthorized("empty authorization token"));
        }

        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(AppError::unauthorized("invalid token format"));
        }

        let header_bytes = URL_SAFE_NO_PAD
            .decode(segments[0].as_bytes())
            .map_err(|_| AppError::unauthorized("invalid token header"))?;
        let header: JwtHeaderParts = serde_json::from_slice(&header_bytes)
            .map_err(|_| AppError::unauthorized("invalid token header"))?;
        if header.alg != "HS256" {
            return Err(AppError::unauthorized("unsupported signing algorithm"));
        }

        let signing_input = format!(
            "{header}.{payload}",
            header = segments[0],
            payload = segments[1]
        );
        let signature = URL_SAFE_NO_PAD
            .decode(segments[2].as_bytes())
            .map_err(|_| AppError::unauthorized("invalid token signature"))?;
        hmac::verify(&self.key, signing_input.as_bytes(), &signature)
            .map_err(|_| AppError::unauthorized("token validation error"))?;

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(segments[1].as_bytes())
            .map_err(|_| AppError::unauthorized("invalid token payload"))?;
        let claims: BTreeMap<String, Value> = serde_json::from_slice(&payload_bytes)
            .map_err(|_| AppError::unauthorized("invalid token payload"))?;

        self.validate_claims(&claims)?;
        Ok(AccessToken::new(claims))
    }

    fn validate_claims(&self, claims: &BTreeMap<String, Value>) -> Result<(), AppError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|_| Duration::from_secs(0))
            .as_secs() as i64;
        match claims.get("exp").and_then(Value::as_i64) {
            Some(exp) if exp >= now => {}
            Some(_) => return Err(AppError::unauthorized("token expired")),
            None => return Err(AppError::unauthorized("token missing expiry")),
        }

        match claims.get("iss").and_then(Value::as_str) {
            Some(value) if value == self.issuer => {}
            _ => return Err(AppError::unauthorized("invalid issuer")),
        }

        match claims.get("aud").and_then(Value::as_str) {
            Some(value) if value == self.audience => {}
            _ => return Err(AppError::unauthorized("invalid audience")),
        }

        Ok(())
    }
}

pub fn extract_bearer_token(value: &str) -> Option<&str> {
    let value = value.trim();
    if let Some(rest) = value.strip_prefix("Bearer ") {
        Some(rest.trim())
    } else if let Some(rest) = value.strip_prefix("bearer ") {
        Some(rest.trim())
    } else {
        None
    }
}

/// Verification layer. A present token must verify or the request is
/// rejected; a request without an Authorization header continues without an
/// [`AccessToken`] extension, and the credential hook downstream turns that
/// into `Unauthenticated` before any credential work happens.
pub async fn http_layer(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)
        .map(str::to_owned);

    if let Some(token) = token {
        match state.verifier.verify(&token) {
            Ok(access_token) => {
                req.extensions_mut().insert(access_token);
            }
            Err(err) => return err.into_response(),
        }
    }

    next.run(req).await
}
