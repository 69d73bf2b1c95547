use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{info, Instrument};

use crate::error::{attach_correlation, AppError};
use crate::state::AppState;
use crate::telemetry::{request_span, CorrelationId};
use credential_core::{extract_tenant_id, AccessToken};

/// The interception hook: runs exactly once per tool invocation, ahead of the
/// handler. Derives the caller's tenant from the verified token, resolves the
/// credential bundle, and attaches it to this request's extensions — the
/// request-scoped state the handler reads instead of re-resolving.
///
/// Any failure short-circuits: the inner handler is never called, identity
/// failures never reach the store, and the error becomes the operation's
/// response. A detected corruption is surfaced, never papered over with the
/// fallback bundle.
pub async fn credential_layer(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let correlation = req
        .extensions()
        .get::<CorrelationId>()
        .cloned()
        .unwrap_or_else(|| CorrelationId(String::new()));
    let token = req.extensions().get::<AccessToken>().cloned();

    let span = request_span("credentials.resolve", &correlation.0);
    let resolved = async {
        let tenant = extract_tenant_id(token.as_ref())?;
        let bundle = state.resolver.resolve(&tenant).await?;
        Ok::<_, credential_core::Error>((tenant, bundle))
    }
    .instrument(span)
    .await;

    match resolved {
        Ok((tenant, bundle)) => {
            info!(tenant = %tenant, "injected credentials into request scope");
            req.extensions_mut().insert(bundle);
            next.run(req).await
        }
        Err(err) => attach_correlation(AppError::from(err), &correlation).into_response(),
    }
}
