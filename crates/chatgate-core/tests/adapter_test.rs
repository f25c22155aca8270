//! Integration tests for `RequestAdapter` against stand-in runtimes.
//!
//! The adapter must return exactly what its runtime produces, so every test
//! compares the adapter's response with the runtime's canned one.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::Response;

use chatgate_core::{
    AdapterConfig, AdapterProfile, AgentRuntime, ConfigError, HandlerContext, RequestAdapter,
    ServiceAdapter,
};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// What the fake runtime saw for one call.
#[derive(Debug, Clone)]
struct SeenCall {
    method: Method,
    path: String,
    body: Vec<u8>,
    endpoint: String,
    service_adapter: ServiceAdapter,
}

/// Returns a fixed response and records every call.
struct CannedRuntime {
    status: StatusCode,
    body: &'static str,
    calls: Mutex<Vec<SeenCall>>,
}

impl CannedRuntime {
    fn new(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            body,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn canned(&self) -> Response {
        let mut resp = Response::new(Body::from(self.body));
        *resp.status_mut() = self.status;
        resp.headers_mut()
            .insert("x-runtime", HeaderValue::from_static("canned"));
        resp
    }

    fn calls(&self) -> Vec<SeenCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentRuntime for CannedRuntime {
    fn name(&self) -> &str {
        "canned"
    }

    async fn handle(&self, ctx: HandlerContext) -> Response {
        let (parts, body) = ctx.request.into_parts();
        let body = axum::body::to_bytes(body, 1_048_576).await.unwrap();
        self.calls.lock().unwrap().push(SeenCall {
            method: parts.method,
            path: parts.uri.path().to_string(),
            body: body.to_vec(),
            endpoint: ctx.endpoint,
            service_adapter: ctx.service_adapter,
        });
        self.canned()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn post(uri: &str, body: &'static str) -> Request {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn body_string(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), 1_048_576)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_passes_through_unchanged() {
    let runtime = Arc::new(CannedRuntime::new(StatusCode::OK, "{\"data\":{}}"));
    let cfg = AdapterConfig::new(AdapterProfile::Credentialed).with_api_key("sk-test");
    let adapter = RequestAdapter::with_runtime(&cfg, runtime.clone()).unwrap();

    let resp = adapter
        .handle(post("/api/copilotkit", "{\"query\":\"hi\"}"))
        .await;
    let expected = runtime.canned();

    assert_eq!(resp.status(), expected.status());
    assert_eq!(resp.headers(), expected.headers());
    assert_eq!(body_string(resp).await, body_string(expected).await);
}

#[tokio::test]
async fn runtime_failures_are_not_translated() {
    for status in [
        StatusCode::BAD_GATEWAY,
        StatusCode::UNAUTHORIZED,
        StatusCode::UNPROCESSABLE_ENTITY,
    ] {
        let runtime = Arc::new(CannedRuntime::new(status, "{\"error\":\"upstream says no\"}"));
        let cfg = AdapterConfig::new(AdapterProfile::Default);
        let adapter = RequestAdapter::with_runtime(&cfg, runtime).unwrap();

        let resp = adapter.handle(post("/api/copilotkit", "not json")).await;
        assert_eq!(resp.status(), status);
        assert_eq!(body_string(resp).await, "{\"error\":\"upstream says no\"}");
    }
}

#[tokio::test]
async fn runtime_receives_request_adapter_and_endpoint() {
    let runtime = Arc::new(CannedRuntime::new(StatusCode::OK, ""));
    let cfg = AdapterConfig::new(AdapterProfile::Credentialed).with_api_key("sk-test");
    let adapter = RequestAdapter::with_runtime(&cfg, runtime.clone()).unwrap();

    adapter
        .handle(post("/api/copilotkit", "{\"operationName\":\"run\"}"))
        .await;

    let calls = runtime.calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.method, Method::POST);
    assert_eq!(call.path, "/api/copilotkit");
    assert_eq!(call.body, b"{\"operationName\":\"run\"}");
    assert_eq!(call.endpoint, "/api/copilotkit");
    assert_eq!(call.service_adapter, ServiceAdapter::credentialed("sk-test"));
}

#[tokio::test]
async fn credential_less_profile_passes_empty_service_adapter() {
    let runtime = Arc::new(CannedRuntime::new(StatusCode::OK, ""));
    let cfg = AdapterConfig::new(AdapterProfile::Default);
    let adapter = RequestAdapter::with_runtime(&cfg, runtime.clone()).unwrap();

    adapter.handle(post("/api/copilotkit", "{}")).await;

    assert_eq!(runtime.calls()[0].service_adapter, ServiceAdapter::Empty);
}

#[tokio::test]
async fn requests_are_independent() {
    let runtime = Arc::new(CannedRuntime::new(StatusCode::OK, "ok"));
    let cfg = AdapterConfig::new(AdapterProfile::Default);
    let adapter = RequestAdapter::with_runtime(&cfg, runtime.clone()).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let adapter = adapter.clone();
            tokio::spawn(async move { adapter.handle(post("/api/copilotkit", "{}")).await })
        })
        .collect();
    for handle in handles {
        let resp = handle.await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
    assert_eq!(runtime.calls().len(), 8);
}

#[test]
fn missing_credential_fails_construction() {
    let runtime = Arc::new(CannedRuntime::new(StatusCode::OK, ""));
    let cfg = AdapterConfig::new(AdapterProfile::Credentialed);
    let err = RequestAdapter::with_runtime(&cfg, runtime.clone()).unwrap_err();
    assert_eq!(err, ConfigError::MissingCredential);
    assert!(runtime.calls().is_empty());
}
