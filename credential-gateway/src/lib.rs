pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod services;
pub mod state;
pub mod telemetry;

use std::sync::Arc;

use anyhow::Context;
use auth::TokenVerifier;
use config::GatewayConfig;
use credential_core::{CredentialResolver, CredentialStore};
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use state::AppState;
pub use telemetry::CorrelationId;

pub async fn run(config: GatewayConfig) -> anyhow::Result<()> {
    let state = build_state(&config).await?;

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind listener on {addr}", addr = config.bind))?;
    let addr = listener.local_addr()?;
    info!(%addr, "credential gateway listening");

    axum::serve(listener, http::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}

/// Assemble the process-lifetime state: backend, encrypted store, resolver,
/// and token verifier. Explicit construction so tests can substitute an
/// in-memory backend and a throwaway key.
pub async fn build_state(config: &GatewayConfig) -> anyhow::Result<AppState> {
    let backend = config::build_backend(&config.store).await?;
    let store = CredentialStore::new(backend, &config.encryption_key);
    let resolver = CredentialResolver::new(store);
    let verifier = TokenVerifier::new(&config.auth);
    Ok(AppState::new(Arc::new(resolver), Arc::new(verifier)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(?err, "failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => warn!(?err, "failed to install sigterm handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
