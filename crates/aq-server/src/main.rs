//! AllQuery RS Server
//!
//! HTTP server exposing one PostgreSQL table through the declarative query
//! config API. The table's columns become the model schema.

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aq_axum::AxumAdapter;
use aq_core::StoreAdapter;
use aq_postgres::{Database, DatabaseConfig, PgStoreAdapter};

/// Server configuration from environment variables
struct ServerConfig {
    port: u16,
    table: String,
    api_path: String,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            table: std::env::var("ALLQUERY_TABLE").unwrap_or_else(|_| "users".to_string()),
            api_path: std::env::var("ALLQUERY_API_PATH").unwrap_or_else(|_| "/users".to_string()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging
    init_tracing();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.port,
        table = %config.table,
        "Starting AllQuery RS"
    );

    // Connect to database
    let db = Database::connect(&DatabaseConfig::from_env()).await?;
    db.ping().await?;
    info!("Connected to database");

    // The table's column list is the attribute whitelist
    let store =
        PgStoreAdapter::from_information_schema(db.pool().clone(), config.table.as_str()).await?;

    // Build router
    let app = build_router(Arc::new(store), &config.api_path);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,aq_server=debug,aq_axum=debug,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Build the application router
fn build_router(store: Arc<dyn StoreAdapter>, api_path: &str) -> Router {
    let query_routes = AxumAdapter::new(store, api_path).router();

    Router::new()
        .route("/health", get(health))
        .merge(query_routes)
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
}

/// Health check endpoint
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_core::{validate, ModelSchema, QueryConfig, StoreError};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    struct StubStore {
        schema: ModelSchema,
    }

    #[async_trait::async_trait]
    impl StoreAdapter for StubStore {
        fn schema(&self) -> &ModelSchema {
            &self.schema
        }

        async fn execute(
            &self,
            config: &QueryConfig,
        ) -> Result<Vec<serde_json::Value>, StoreError> {
            validate(config, &self.schema)?;
            Ok(vec![])
        }
    }

    fn test_app() -> Router {
        let store = Arc::new(StubStore {
            schema: ModelSchema::new(["name", "age"]),
        });
        build_router(store, "/items")
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_query_route_mounted() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/items")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let app = test_app();

        // q={"bogus":1}
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/items?q=%7B%22bogus%22%3A1%7D")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
