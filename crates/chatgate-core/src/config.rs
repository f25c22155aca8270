//! Startup configuration for the request adapter.
//!
//! Everything here is resolved once while the process starts and handed to
//! [`crate::adapter::RequestAdapter::from_config`]; handlers never read the
//! process environment themselves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::agent::{AgentDescriptor, AgentRegistry};
use crate::service::ServiceAdapter;

/// Environment variable holding the model-provider credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable holding the agent deployment URL.
pub const DEPLOYMENT_URL_ENV: &str = "LANGGRAPH_DEPLOYMENT_URL";

/// Errors raised while turning configuration into live components.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("model provider credential is required but OPENAI_API_KEY is not set")]
    MissingCredential,

    #[error("invalid adapter profile {0:?} (expected \"credentialed\" or \"default\")")]
    InvalidProfile(String),

    #[error("endpoint must start with '/': {0:?}")]
    InvalidEndpoint(String),
}

/// The two shipped adapter presets.
///
/// They differ only in whether a provider credential must be present and in
/// the name the agent is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterProfile {
    /// Credential required, agent registered as `my_agent`.
    #[default]
    Credentialed,
    /// No credential needed, agent registered as `default`.
    Default,
}

impl AdapterProfile {
    pub fn agent_name(self) -> &'static str {
        match self {
            Self::Credentialed => "my_agent",
            Self::Default => "default",
        }
    }

    pub fn credential_required(self) -> bool {
        matches!(self, Self::Credentialed)
    }
}

impl fmt::Display for AdapterProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credentialed => f.write_str("credentialed"),
            Self::Default => f.write_str("default"),
        }
    }
}

impl FromStr for AdapterProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credentialed" => Ok(Self::Credentialed),
            "default" => Ok(Self::Default),
            other => Err(ConfigError::InvalidProfile(other.to_string())),
        }
    }
}

/// Fully resolved adapter configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Model-provider credential, if one was supplied.
    pub api_key: Option<String>,
    /// Base URL of the remote agent deployment.
    pub deployment_url: String,
    /// Graph identifier inside the deployment.
    pub graph_id: String,
    /// Name the agent is registered under.
    pub agent_name: String,
    /// Fail construction when no credential is present.
    pub credential_required: bool,
    /// Path the adapter is mounted at.
    pub endpoint: String,
}

impl AdapterConfig {
    pub const DEFAULT_DEPLOYMENT_URL: &str = "http://localhost:2024";
    pub const DEFAULT_GRAPH_ID: &str = "agent";
    pub const DEFAULT_ENDPOINT: &str = "/api/copilotkit";

    /// Defaults for `profile`, with no credential.
    pub fn new(profile: AdapterProfile) -> Self {
        Self {
            api_key: None,
            deployment_url: Self::DEFAULT_DEPLOYMENT_URL.to_owned(),
            graph_id: Self::DEFAULT_GRAPH_ID.to_owned(),
            agent_name: profile.agent_name().to_owned(),
            credential_required: profile.credential_required(),
            endpoint: Self::DEFAULT_ENDPOINT.to_owned(),
        }
    }

    /// Build a config for `profile`, reading [`API_KEY_ENV`] and
    /// [`DEPLOYMENT_URL_ENV`] through `lookup`.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(profile: AdapterProfile, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::new(profile);
        config.api_key = non_empty(API_KEY_ENV);
        if let Some(url) = non_empty(DEPLOYMENT_URL_ENV) {
            config.deployment_url = url;
        }
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_deployment_url(mut self, url: impl Into<String>) -> Self {
        self.deployment_url = url.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// The descriptor for the single configured agent.
    pub fn descriptor(&self) -> AgentDescriptor {
        AgentDescriptor::new(&self.deployment_url, &self.graph_id)
    }

    /// A registry holding the single configured agent.
    pub fn registry(&self) -> AgentRegistry {
        AgentRegistry::single(&self.agent_name, self.descriptor())
    }

    /// The service adapter matching the credential settings.
    pub fn service_adapter(&self) -> Result<ServiceAdapter, ConfigError> {
        match (&self.api_key, self.credential_required) {
            (Some(key), _) => Ok(ServiceAdapter::credentialed(key)),
            (None, true) => Err(ConfigError::MissingCredential),
            (None, false) => Ok(ServiceAdapter::Empty),
        }
    }

    /// Check the parts that can be wrong independent of the environment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.endpoint.starts_with('/') {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }
        Ok(())
    }
}

impl fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("deployment_url", &self.deployment_url)
            .field("graph_id", &self.graph_id)
            .field("agent_name", &self.agent_name)
            .field("credential_required", &self.credential_required)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
