//! Agent registration: named pointers at remote agent deployments.
//!
//! The registry is built once at startup and never mutated afterwards, so
//! it can be shared between request handlers behind an `Arc` without any
//! locking.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Errors raised while building an [`AgentRegistry`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate agent name: {0:?}")]
    DuplicateAgent(String),

    #[error("agent registry must contain at least one agent")]
    Empty,
}

/// Where a remote agent graph lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentDescriptor {
    /// Base URL of the agent deployment (e.g. `http://localhost:2024`).
    pub deployment_url: String,
    /// Identifier of the graph inside the deployment.
    pub graph_id: String,
}

impl AgentDescriptor {
    pub fn new(deployment_url: impl Into<String>, graph_id: impl Into<String>) -> Self {
        Self {
            deployment_url: deployment_url.into(),
            graph_id: graph_id.into(),
        }
    }
}

/// Immutable mapping from agent name to [`AgentDescriptor`].
///
/// Iteration order is sorted by name; [`AgentRegistry::first`] is the agent
/// used when a request does not name one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRegistry {
    agents: BTreeMap<String, AgentDescriptor>,
}

impl AgentRegistry {
    /// A registry holding exactly one agent.
    pub fn single(name: impl Into<String>, descriptor: AgentDescriptor) -> Self {
        let mut agents = BTreeMap::new();
        agents.insert(name.into(), descriptor);
        Self { agents }
    }

    /// Build a registry from `(name, descriptor)` pairs.
    ///
    /// Names must be unique and at least one entry is required.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (S, AgentDescriptor)>,
        S: Into<String>,
    {
        let mut agents = BTreeMap::new();
        for (name, descriptor) in entries {
            let name = name.into();
            if agents.contains_key(&name) {
                return Err(RegistryError::DuplicateAgent(name));
            }
            agents.insert(name, descriptor);
        }
        if agents.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(Self { agents })
    }

    /// Look up an agent by name.
    pub fn get(&self, name: &str) -> Option<&AgentDescriptor> {
        self.agents.get(name)
    }

    /// The agent used when a request does not ask for a specific one.
    pub fn first(&self) -> Option<(&str, &AgentDescriptor)> {
        self.agents
            .iter()
            .next()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    /// Registered agent names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.agents.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AgentDescriptor)> {
        self.agents.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
