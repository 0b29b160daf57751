//! HTTP search endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

use tablefind_core::config::SearchSettings;
use tablefind_core::types::FieldPrefix;
use tablefind_core::Error;
use tablefind_embed::ExpansionConfig;
use tablefind_engine::{Page, QueryExecutor};

/// Process-wide read-only resources, built once at startup.
pub struct AppState {
    pub executor: QueryExecutor,
    pub expansion: Option<ExpansionConfig>,
    pub search: SearchSettings,
}

/// Raw query-string values; parsing and defaults happen in the handler.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub expand: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub prefix: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/", get(banner))
        .route("/search", get(search))
        .layer(cors)
        .with_state(state)
}

async fn banner() -> &'static str {
    "This is the search engine backend"
}

fn error_response(err: &Error) -> Response {
    let status = if err.is_user_error() { StatusCode::BAD_REQUEST } else { StatusCode::INTERNAL_SERVER_ERROR };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(%err, "search failed");
    }
    (status, Json(ErrorBody { error: err.to_string() })).into_response()
}

async fn search(State(state): State<Arc<AppState>>, Query(params): Query<SearchParams>) -> Response {
    let prefix = match params.prefix.as_deref().unwrap_or("S").parse::<FieldPrefix>() {
        Ok(prefix) => prefix,
        Err(err) => return error_response(&err),
    };
    let page = Page::from_params(params.offset.as_deref(), params.limit.as_deref(), &state.search);
    let expand = params.expand.as_deref().is_some_and(|e| !e.is_empty());
    let query = params.q.unwrap_or_default();

    let task_state = Arc::clone(&state);
    let outcome = tokio::task::spawn_blocking(move || {
        let expansion = if expand { task_state.expansion.as_ref() } else { None };
        task_state.executor.execute(&query, prefix, page, expansion)
    })
    .await;

    match outcome {
        Ok(Ok(result)) => (StatusCode::OK, Json(result)).into_response(),
        Ok(Err(err)) => error_response(&err),
        Err(join_err) => error_response(&Error::Operation(join_err.to_string())),
    }
}
