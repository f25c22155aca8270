//! The request adapter: one fixed endpoint delegating to an agent runtime.

use std::fmt;
use std::sync::Arc;

use axum::extract::Request;
use axum::response::Response;

use crate::config::{AdapterConfig, ConfigError};
use crate::runtime::{AgentRuntime, HandlerContext, RemoteAgentRuntime};
use crate::service::ServiceAdapter;

/// Hands every request to its runtime and returns the runtime's response
/// verbatim.
///
/// Built once at startup and cloned into each handler; it holds no mutable
/// state.
#[derive(Clone)]
pub struct RequestAdapter {
    runtime: Arc<dyn AgentRuntime>,
    service_adapter: ServiceAdapter,
    endpoint: String,
}

impl RequestAdapter {
    pub fn new(
        runtime: Arc<dyn AgentRuntime>,
        service_adapter: ServiceAdapter,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            runtime,
            service_adapter,
            endpoint: endpoint.into(),
        }
    }

    /// Build the production adapter: a [`RemoteAgentRuntime`] holding the
    /// single configured agent.
    ///
    /// Fails when the config requires a credential and none is present.
    pub fn from_config(config: &AdapterConfig) -> Result<Self, ConfigError> {
        let runtime = RemoteAgentRuntime::new(config.registry());
        Self::with_runtime(config, Arc::new(runtime))
    }

    /// Like [`RequestAdapter::from_config`] but with a caller-supplied runtime.
    pub fn with_runtime(
        config: &AdapterConfig,
        runtime: Arc<dyn AgentRuntime>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let service_adapter = config.service_adapter()?;
        tracing::info!(
            agent = %config.agent_name,
            deployment_url = %config.deployment_url,
            graph_id = %config.graph_id,
            credentialed = service_adapter.is_credentialed(),
            runtime = runtime.name(),
            "request adapter ready at {}",
            config.endpoint
        );
        Ok(Self::new(runtime, service_adapter, &config.endpoint))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn runtime_name(&self) -> &str {
        self.runtime.name()
    }

    pub fn service_adapter(&self) -> &ServiceAdapter {
        &self.service_adapter
    }

    /// Delegate one request to the runtime.
    pub async fn handle(&self, request: Request) -> Response {
        let ctx = HandlerContext {
            request,
            service_adapter: self.service_adapter.clone(),
            endpoint: self.endpoint.clone(),
        };
        self.runtime.handle(ctx).await
    }
}

impl fmt::Debug for RequestAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestAdapter")
            .field("runtime", &self.runtime.name())
            .field("service_adapter", &self.service_adapter)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
