//! Runtime that relays requests to a remote agent deployment over HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Json;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderName, StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;

use super::{AgentRuntime, HandlerContext};
use crate::agent::{AgentDescriptor, AgentRegistry};

/// Request header naming the agent to talk to.
pub const AGENT_HEADER: HeaderName = HeaderName::from_static("x-agent-name");

/// Largest request body relayed upstream.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Relays each request to the deployment of the selected agent and streams
/// the upstream response back unchanged.
#[derive(Debug, Clone)]
pub struct RemoteAgentRuntime {
    registry: Arc<AgentRegistry>,
    client: reqwest::Client,
}

impl RemoteAgentRuntime {
    pub fn new(registry: AgentRegistry) -> Self {
        Self::with_client(registry, reqwest::Client::new())
    }

    pub fn with_client(registry: AgentRegistry, client: reqwest::Client) -> Self {
        Self {
            registry: Arc::new(registry),
            client,
        }
    }

    /// Pick the agent named by [`AGENT_HEADER`], or the first registered one.
    fn select_agent(&self, headers: &HeaderMap) -> Result<(String, &AgentDescriptor), Response> {
        match headers.get(&AGENT_HEADER) {
            Some(value) => {
                let name = value.to_str().unwrap_or_default().trim().to_string();
                self.registry
                    .get(&name)
                    .map(|descriptor| (name.clone(), descriptor))
                    .ok_or_else(|| {
                        error_response(StatusCode::NOT_FOUND, format!("unknown agent: {name}"))
                    })
            }
            None => self
                .registry
                .first()
                .map(|(name, descriptor)| (name.to_string(), descriptor))
                .ok_or_else(|| {
                    error_response(StatusCode::SERVICE_UNAVAILABLE, "no agents registered")
                }),
        }
    }
}

#[async_trait]
impl AgentRuntime for RemoteAgentRuntime {
    fn name(&self) -> &str {
        "remote"
    }

    async fn handle(&self, ctx: HandlerContext) -> Response {
        let HandlerContext {
            request,
            service_adapter,
            endpoint,
        } = ctx;
        let (parts, body) = request.into_parts();

        let (agent_name, descriptor) = match self.select_agent(&parts.headers) {
            Ok(selected) => selected,
            Err(resp) => return resp,
        };

        if declared_length(&parts.headers).is_some_and(|len| len > MAX_BODY_BYTES) {
            return error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("request body exceeds {MAX_BODY_BYTES} bytes"),
            );
        }
        let body = match collect_body(body, MAX_BODY_BYTES).await {
            Ok(bytes) => bytes,
            Err(BodyError::TooLarge) => {
                tracing::warn!(agent = %agent_name, "request body exceeds {MAX_BODY_BYTES} bytes");
                return error_response(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    format!("request body exceeds {MAX_BODY_BYTES} bytes"),
                );
            }
            Err(BodyError::Read(e)) => {
                tracing::warn!(agent = %agent_name, "failed to read request body: {e}");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("failed to read request body: {e}"),
                );
            }
        };
        let body = inject_assistant_id(body, &descriptor.graph_id);

        let sub_path = upstream_path(parts.uri.path(), &endpoint);
        let mut url = format!(
            "{}{}",
            descriptor.deployment_url.trim_end_matches('/'),
            sub_path
        );
        if let Some(query) = parts.uri.query() {
            url.push('?');
            url.push_str(query);
        }

        // The provider credential stays here; the deployment never sees it.
        let headers = forward_request_headers(&parts.headers);

        tracing::debug!(
            agent = %agent_name,
            method = %parts.method,
            %url,
            credentialed = service_adapter.is_credentialed(),
            "relaying request"
        );

        let upstream = self
            .client
            .request(parts.method, &url)
            .headers(headers)
            .body(body)
            .send()
            .await;

        match upstream {
            Ok(resp) => {
                let status = resp.status();
                let headers = strip_hop_by_hop(resp.headers());
                let mut out = Response::new(Body::from_stream(resp.bytes_stream()));
                *out.status_mut() = status;
                *out.headers_mut() = headers;
                out
            }
            Err(e) => {
                tracing::warn!(agent = %agent_name, %url, "agent deployment unreachable: {e}");
                error_response(
                    StatusCode::BAD_GATEWAY,
                    format!("agent deployment unreachable: {e}"),
                )
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "error": message.into() });
    (status, Json(body)).into_response()
}

enum BodyError {
    TooLarge,
    Read(axum::Error),
}

/// Buffer `body`, giving up as soon as it grows past `limit` bytes.
async fn collect_body(body: Body, limit: usize) -> Result<Bytes, BodyError> {
    let mut stream = body.into_data_stream();
    let mut buf = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(BodyError::Read)?;
        if buf.len() + chunk.len() > limit {
            return Err(BodyError::TooLarge);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(Bytes::from(buf))
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// The part of `path` below `endpoint`, always starting with `/`.
///
/// Paths that do not sit under `endpoint` are relayed whole.
fn upstream_path(path: &str, endpoint: &str) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    match path.strip_prefix(endpoint) {
        Some("") => "/".to_string(),
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => path.to_string(),
    }
}

/// Default the deployment's `assistant_id` to the agent's graph when the
/// body is a JSON object that does not name one.
fn inject_assistant_id(body: Bytes, graph_id: &str) -> Bytes {
    let Ok(serde_json::Value::Object(mut map)) = serde_json::from_slice::<serde_json::Value>(&body) else {
        return body;
    };
    if map.contains_key("assistant_id") {
        return body;
    }
    map.insert(
        "assistant_id".to_string(),
        serde_json::Value::String(graph_id.to_string()),
    );
    match serde_json::to_vec(&map) {
        Ok(rewritten) => Bytes::from(rewritten),
        Err(_) => body,
    }
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

fn forward_request_headers(src: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(src.len());
    for (name, value) in src {
        if is_hop_by_hop(name)
            || name == header::HOST
            || name == header::CONTENT_LENGTH
            || name == AGENT_HEADER
        {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

fn strip_hop_by_hop(src: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(src.len());
    for (name, value) in src {
        if is_hop_by_hop(name) || name == header::CONTENT_LENGTH {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}
