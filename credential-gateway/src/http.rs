use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::{routing::get, Extension, Json, Router};
use serde::Deserialize;
use tracing::Instrument;

use crate::auth;
use crate::credentials;
use crate::error::{attach_correlation, AppError};
use crate::services::{ApiService, DatabaseService};
use crate::state::AppState;
use crate::telemetry::{correlation_layer, request_span, CorrelationId};
use credential_core::CredentialBundle;

const DEFAULT_QUERY_LIMIT: usize = 10;

#[derive(Deserialize)]
struct DbQuery {
    limit: Option<usize>,
}

pub fn router(state: AppState) -> Router {
    // Layer order matters: auth verifies the token, then the credential hook
    // resolves and injects the bundle, then the tool handler runs.
    let tools = tool_routes()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            credentials::credential_layer,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::http_layer,
        ));

    Router::new()
        .route("/healthz", get(health_check))
        .merge(tools)
        .layer(middleware::from_fn(correlation_layer))
        .with_state(state)
}

fn tool_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tools/api/users/{user_id}", get(api_get_user_data))
        .route("/v1/tools/db/users", get(db_query_users))
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// Fetch user data through the mock external API, using the credentials the
/// hook attached to this request.
async fn api_get_user_data(
    Extension(correlation): Extension<CorrelationId>,
    Extension(bundle): Extension<CredentialBundle>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let span = request_span("tools.api.get_user_data", &correlation.0);
    async move {
        let params = bundle
            .service("api_service")
            .ok_or_else(|| AppError::internal("no api_service credentials in request scope"))?;
        let user = ApiService::new(params).get_user_data(&user_id).await;
        Ok((StatusCode::OK, Json(user)))
    }
    .instrument(span)
    .await
    .map_err(|err: AppError| attach_correlation(err, &correlation))
}

/// Query users through the mock database, using the injected credentials.
async fn db_query_users(
    Extension(correlation): Extension<CorrelationId>,
    Extension(bundle): Extension<CredentialBundle>,
    Query(query): Query<DbQuery>,
) -> Result<impl IntoResponse, AppError> {
    let span = request_span("tools.db.query_users", &correlation.0);
    async move {
        let params = bundle
            .service("database")
            .ok_or_else(|| AppError::internal("no database credentials in request scope"))?;
        let db = DatabaseService::new(params);
        let users = db.query_users(query.limit.unwrap_or(DEFAULT_QUERY_LIMIT)).await;
        Ok((
            StatusCode::OK,
            Json(serde_json::json!({
                "users": users,
                "count": users.len(),
                "database_url": db.database_url(),
            })),
        ))
    }
    .instrument(span)
    .await
    .map_err(|err: AppError| attach_correlation(err, &correlation))
}
