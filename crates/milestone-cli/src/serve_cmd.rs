use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use milestone_core::sample::{Sample, load_sample};
use milestone_core::{Plan, Planner};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub query: Option<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(planner: Planner) -> Router {
    Router::new()
        .route("/generate", post(generate))
        .route("/sample", get(sample))
        .layer(CorsLayer::permissive())
        .with_state(planner)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(planner: Planner, bind: &str, port: u16) -> Result<()> {
    let provider = planner.provider_name().to_string();
    let app = build_router(planner);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!(%provider, "milestone serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("milestone serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for Ctrl+C; shutting down");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn generate(
    State(planner): State<Planner>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<Plan>, AppError> {
    let Json(request) = body?;
    let query = request
        .query
        .ok_or_else(|| AppError::bad_request("missing 'query' field"))?;

    let request_id = Uuid::new_v4();
    tracing::info!(%request_id, query = %query, "generate: request received");
    let plan = planner.generate(&query).await;
    tracing::info!(%request_id, entries = plan.entries.len(), "generate: plan ready");
    Ok(Json(plan))
}

async fn sample() -> Json<Sample> {
    Json(load_sample())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
