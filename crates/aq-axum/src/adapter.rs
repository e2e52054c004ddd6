//! Axum Framework Adapter
//!
//! Exposes a store adapter over HTTP: a single GET route whose optional `q`
//! query parameter carries a JSON query config. A missing `q` is an empty
//! config and fetches everything the store allows.

use std::sync::Arc;

use aq_core::{FrameworkAdapter, QueryConfig, StoreAdapter, StoreError};
use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};

/// Serves one store adapter under a configurable route path.
pub struct AxumAdapter {
    store: Arc<dyn StoreAdapter>,
    api_path: String,
}

impl AxumAdapter {
    /// Create an adapter serving `store` at GET `api_path`.
    pub fn new(store: Arc<dyn StoreAdapter>, api_path: impl Into<String>) -> Self {
        Self {
            store,
            api_path: api_path.into(),
        }
    }

    /// Build the router for the query route. The router carries its own
    /// state, so it can be merged into a larger application.
    pub fn router(&self) -> Router {
        Router::new()
            .route(&self.api_path, get(run_query))
            .with_state(QueryState {
                store: self.store.clone(),
            })
    }
}

#[async_trait]
impl FrameworkAdapter for AxumAdapter {
    async fn start(self, port: u16) -> std::io::Result<()> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, app).await
    }
}

#[derive(Clone)]
struct QueryState {
    store: Arc<dyn StoreAdapter>,
}

#[derive(Debug, Deserialize)]
struct QueryParams {
    /// JSON query config; absent means fetch everything.
    q: Option<String>,
}

/// GET handler: parse `q`, run it against the store, return matching rows.
async fn run_query(
    State(state): State<QueryState>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Json<Vec<serde_json::Value>>> {
    let config = match params.q.as_deref() {
        Some(raw) => QueryConfig::from_json_str(raw)
            .map_err(|e| ApiError::bad_request(format!("malformed query config: {e}")))?,
        None => QueryConfig::new(),
    };

    match state.store.execute(&config).await {
        Ok(rows) => Ok(Json(rows)),
        Err(StoreError::Query(e)) => Err(ApiError::bad_request(e.to_string())),
        Err(StoreError::Backend { message }) => {
            tracing::error!(%message, "store backend failure");
            Err(ApiError::internal(format!(
                "store backend failure: {message}"
            )))
        }
    }
}
