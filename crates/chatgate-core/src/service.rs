//! Model-provider service adapter handed to the runtime on every call.
//!
//! The credential belongs to the model provider. It is never copied onto
//! requests sent to the agent deployment.

use std::fmt;

/// Model-provider credential settings for the runtime.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum ServiceAdapter {
    /// No provider credential configured.
    #[default]
    Empty,
    /// An explicit provider API key.
    Credentialed { api_key: String },
}

impl ServiceAdapter {
    pub fn credentialed(api_key: impl Into<String>) -> Self {
        Self::Credentialed {
            api_key: api_key.into(),
        }
    }

    pub fn is_credentialed(&self) -> bool {
        matches!(self, Self::Credentialed { .. })
    }
}

impl fmt::Debug for ServiceAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Credentialed { .. } => f
                .debug_struct("Credentialed")
                .field("api_key", &"<redacted>")
                .finish(),
        }
    }
}
