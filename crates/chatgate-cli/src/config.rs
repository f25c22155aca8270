//! Configuration file management for chatgate.
//!
//! Provides a TOML-based config file at `~/.config/chatgate/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use chatgate_core::config::{API_KEY_ENV, DEPLOYMENT_URL_ENV};
use chatgate_core::{AdapterConfig, AdapterProfile, ChatLabels, ChatMode};

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub agent: AgentSection,
    pub provider: ProviderSection,
    pub server: ServerSection,
    pub ui: UiSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSection {
    pub deployment_url: Option<String>,
    pub profile: Option<AdapterProfile>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    /// Model-provider API key; `OPENAI_API_KEY` takes precedence.
    pub api_key: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSection {
    pub placeholder: Option<String>,
    pub popup_hint: Option<String>,
    pub mode: Option<ChatMode>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the chatgate config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/chatgate` or `~/.config/chatgate`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("chatgate");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("chatgate")
}

/// Return the path to the chatgate config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file at `path`.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Load the config file from its default location, if there is one.
///
/// A missing file is not an error; a file that exists but cannot be parsed is.
pub fn load_config() -> Result<Option<ConfigFile>> {
    let path = config_path();
    if !path.exists() {
        return Ok(None);
    }
    load_config_from(&path).map(Some)
}

/// Serialize and write the config file to `path`, creating parent dirs as
/// needed. Sets file permissions to 0600 on Unix since it may hold an API key.
pub fn save_config_to(config: &ConfigFile, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub deployment_url: Option<String>,
    pub profile: Option<AdapterProfile>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub mode: Option<ChatMode>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct ChatgateConfig {
    pub adapter: AdapterConfig,
    pub bind: String,
    pub port: u16,
    pub labels: ChatLabels,
    pub initial_mode: ChatMode,
}

impl ChatgateConfig {
    pub const DEFAULT_BIND: &str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 3000;

    /// Resolve configuration from the CLI, the environment, and the default
    /// config file.
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let file = load_config()?;
        Ok(Self::resolve_with(cli, file.as_ref(), |key| std::env::var(key).ok()))
    }

    /// Resolve using the chain: CLI flag > env var > config file > default.
    ///
    /// - Deployment URL: `cli.deployment_url` > `LANGGRAPH_DEPLOYMENT_URL` >
    ///   `agent.deployment_url` > `http://localhost:2024`
    /// - API key: `OPENAI_API_KEY` > `provider.api_key` > none
    /// - Profile: `cli.profile` > `agent.profile` > credentialed
    pub fn resolve_with(
        cli: &CliOverrides,
        file: Option<&ConfigFile>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let profile = cli
            .profile
            .or_else(|| file.and_then(|f| f.agent.profile))
            .unwrap_or_default();

        let from_file = |key: &str| -> Option<String> {
            let file = file?;
            match key {
                API_KEY_ENV => file.provider.api_key.clone(),
                DEPLOYMENT_URL_ENV => file.agent.deployment_url.clone(),
                _ => None,
            }
        };
        let mut adapter = AdapterConfig::from_lookup(profile, |key| {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| from_file(key))
        });
        if let Some(url) = &cli.deployment_url {
            adapter.deployment_url = url.clone();
        }

        let bind = cli
            .bind
            .clone()
            .or_else(|| file.and_then(|f| f.server.bind.clone()))
            .unwrap_or_else(|| Self::DEFAULT_BIND.to_string());
        let port = cli
            .port
            .or_else(|| file.and_then(|f| f.server.port))
            .unwrap_or(Self::DEFAULT_PORT);

        let mut labels = ChatLabels::default();
        if let Some(ui) = file.map(|f| &f.ui) {
            if let Some(placeholder) = &ui.placeholder {
                labels.placeholder = placeholder.clone();
            }
            if let Some(hint) = &ui.popup_hint {
                labels.popup_hint = hint.clone();
            }
        }
        let initial_mode = cli
            .mode
            .or_else(|| file.and_then(|f| f.ui.mode))
            .unwrap_or_default();

        Self {
            adapter,
            bind,
            port,
            labels,
            initial_mode,
        }
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
