//! HTTP routes and server loop.
//!
//! Routes are mounted at the root and again under `/api/sql`:
//!
//! | Method | Path | Body | Data |
//! |--------|------|------|------|
//! | POST | `/execute` | `Request` | `QueryResult` |
//! | POST | `/batch` | `[Request]` | `[QueryResult]` |
//! | GET | `/health` | | fixed message |
//!
//! Dispatch is synchronous, so each command runs on the blocking pool.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use querygate_executor::{Executor, QueryResult, Request};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::envelope::Envelope;

/// Message returned by `GET /health`.
pub const HEALTH_MESSAGE: &str = "service is running";

type SharedExecutor = Arc<Executor>;

/// Build the router over a shared executor.
pub fn router(executor: SharedExecutor) -> Router {
    let api = Router::new()
        .route("/execute", post(execute))
        .route("/batch", post(batch))
        .route("/health", get(health));

    Router::new()
        .merge(api.clone())
        .nest("/api/sql", api)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(executor)
}

async fn execute(
    State(executor): State<SharedExecutor>,
    payload: Result<Json<Request>, JsonRejection>,
) -> Envelope<QueryResult> {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return reject(rejection),
    };
    info!(
        target: "querygate::server",
        backend = request.backend_type.as_deref().unwrap_or("relational"),
        "Execute request"
    );

    let outcome = tokio::task::spawn_blocking(move || executor.execute(&request)).await;
    match outcome {
        Ok(Ok(result)) => Envelope::success("command executed", result),
        Ok(Err(e)) => {
            if !e.is_client_error() {
                error!(target: "querygate::server", error = %e, "Execution failed");
            }
            Envelope::from_error(&e)
        }
        Err(join) => panicked(join),
    }
}

async fn batch(
    State(executor): State<SharedExecutor>,
    payload: Result<Json<Vec<Request>>, JsonRejection>,
) -> Envelope<Vec<QueryResult>> {
    let Json(requests) = match payload {
        Ok(body) => body,
        Err(rejection) => return reject(rejection),
    };
    info!(target: "querygate::server", count = requests.len(), "Batch request");

    let outcome = tokio::task::spawn_blocking(move || executor.execute_batch(&requests)).await;
    match outcome {
        Ok(Ok(results)) => Envelope::success("batch executed", results),
        Ok(Err(e)) => Envelope::from_error(&e),
        Err(join) => panicked(join),
    }
}

async fn health() -> Envelope<String> {
    Envelope::success(HEALTH_MESSAGE, HEALTH_MESSAGE.to_string())
}

fn reject<T>(rejection: JsonRejection) -> Envelope<T> {
    warn!(target: "querygate::server", error = %rejection.body_text(), "Malformed request body");
    Envelope::error(400, format!("malformed request body: {}", rejection.body_text()))
}

fn panicked<T>(join: tokio::task::JoinError) -> Envelope<T> {
    error!(target: "querygate::server", error = %join, "Dispatch task aborted");
    Envelope::error(500, format!("internal error: {join}"))
}

/// Ping every configured backend and log the outcome. Failures are logged,
/// not fatal.
pub fn warm_up(executor: &Executor) {
    for (backend, outcome) in executor.ping() {
        match outcome {
            Ok(()) => info!(target: "querygate::server", backend = backend.as_str(), "Backend ready"),
            Err(e) => warn!(
                target: "querygate::server",
                backend = backend.as_str(),
                error = %e,
                "Backend ping failed"
            ),
        }
    }
}

/// Open the configured backends and serve until Ctrl-C.
pub async fn run(config: &ServerConfig) -> anyhow::Result<()> {
    let executor = config.build_executor()?;
    warm_up(&executor);

    let app = router(Arc::new(executor));
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(target: "querygate::server", addr = %addr, "QueryGate listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!(target: "querygate::server", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(target: "querygate::server", error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
