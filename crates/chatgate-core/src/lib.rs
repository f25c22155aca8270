//! Core of chatgate: agent registration, adapter configuration, and the
//! request adapter that delegates to an agent runtime.

pub mod adapter;
pub mod agent;
pub mod config;
pub mod mode;
pub mod runtime;
pub mod service;

pub use adapter::RequestAdapter;
pub use agent::{AgentDescriptor, AgentRegistry, RegistryError};
pub use config::{AdapterConfig, AdapterProfile, ConfigError};
pub use mode::{ChatLabels, ChatMode, ParseChatModeError};
pub use runtime::{AgentRuntime, HandlerContext, RemoteAgentRuntime};
pub use service::ServiceAdapter;
