use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{OriginalUri, Request, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use chatgate_core::{AgentRegistry, RequestAdapter};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    adapter: RequestAdapter,
    agents: Arc<AgentRegistry>,
}

impl AppState {
    pub fn new(adapter: RequestAdapter, agents: AgentRegistry) -> Self {
        Self {
            adapter,
            agents: Arc::new(agents),
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    let endpoint = state.adapter.endpoint().trim_end_matches('/').to_string();
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route(&endpoint, post(relay))
        .route(&format!("{endpoint}/{{*path}}"), post(relay))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = listen_addr(bind, port)?;
    tracing::info!("chatgate serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("chatgate serve shut down");
    Ok(())
}

/// Socket address for `bind` (an IPv4 or IPv6 literal, brackets optional).
fn listen_addr(bind: &str, port: u16) -> Result<SocketAddr> {
    let host = bind.trim_start_matches('[').trim_end_matches(']');
    let ip: IpAddr = host
        .parse()
        .with_context(|| format!("invalid bind address {bind:?}"))?;
    Ok(SocketAddr::new(ip, port))
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Hand the request to the adapter and return whatever it produced.
async fn relay(State(state): State<AppState>, req: Request) -> Response {
    state.adapter.handle(req).await
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::not_found(format!("no route for {}", uri.path()))
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let rows = state
        .agents
        .iter()
        .map(|(name, agent)| {
            format!(
                "<tr><td>{name}</td><td>{url}</td><td>{graph}</td></tr>",
                name = escape_html(name),
                url = escape_html(&agent.deployment_url),
                graph = escape_html(&agent.graph_id),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    Html(format!(
        "<!DOCTYPE html>\
<html><head><title>chatgate</title></head><body>\
<h1>chatgate</h1>\
<p>Agent endpoint: <code>POST {endpoint}</code></p>\
<table><tr><th>Agent</th><th>Deployment</th><th>Graph</th></tr>{rows}</table>\
</body></html>",
        endpoint = escape_html(state.adapter.endpoint()),
    ))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
