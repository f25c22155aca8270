//! Agent runtime interface.
//!
//! The request adapter owns no protocol logic: it hands each inbound request
//! to an [`AgentRuntime`] and returns whatever comes back. The trait is
//! object-safe so the adapter can hold an `Arc<dyn AgentRuntime>`, which is
//! also where tests plug in fakes.
//!
//! ```text
//! axum route --> RequestAdapter::handle(request)
//!                    |
//!                    v
//!          AgentRuntime::handle(HandlerContext { request, service_adapter, endpoint })
//!                    |
//!                    v
//!               Response (returned verbatim)
//! ```

pub mod remote;

use async_trait::async_trait;
use axum::extract::Request;
use axum::response::Response;

use crate::service::ServiceAdapter;

pub use remote::RemoteAgentRuntime;

/// Everything a runtime receives for a single request.
#[derive(Debug)]
pub struct HandlerContext {
    /// The inbound request, untouched.
    pub request: Request,
    /// Provider credential settings for upstream calls.
    pub service_adapter: ServiceAdapter,
    /// Path the adapter is mounted at (e.g. `/api/copilotkit`).
    pub endpoint: String,
}

/// Something that can answer requests on behalf of registered agents.
///
/// Implementations report their own failures as HTTP responses; there is no
/// error channel because callers return the response as-is.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Human-readable name (e.g. "remote").
    fn name(&self) -> &str;

    /// Produce the response for one request.
    async fn handle(&self, ctx: HandlerContext) -> Response;
}

const _: () = {
    fn _assert_object_safe(_: &dyn AgentRuntime) {}
};
