mod config;
mod serve_cmd;
#[cfg(test)]
mod test_util;
mod tui;

use anyhow::Context;
use clap::{Parser, Subcommand};

use chatgate_core::{AdapterConfig, AdapterProfile, ChatMode, RequestAdapter};

use config::{ChatgateConfig, CliOverrides};

#[derive(Parser)]
#[command(name = "chatgate", about = "Chat surface and request relay for a hosted agent")]
struct Cli {
    /// Agent deployment URL (overrides LANGGRAPH_DEPLOYMENT_URL env var)
    #[arg(long, global = true)]
    deployment_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a chatgate config file
    Init {
        /// Adapter profile: credentialed or default
        #[arg(long, default_value_t = AdapterProfile::Credentialed)]
        profile: AdapterProfile,
        /// Model-provider API key to store in the config file
        #[arg(long)]
        api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Serve the agent endpoint over HTTP
    Serve {
        /// Address to bind
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
        /// Adapter profile: credentialed or default
        #[arg(long)]
        profile: Option<AdapterProfile>,
    },
    /// Open the terminal chat surface
    Chat {
        /// Initial presentation: chat, sidebar, or popup
        #[arg(long)]
        mode: Option<ChatMode>,
    },
}

/// Execute the `chatgate init` command: write config file.
fn cmd_init(
    deployment_url: Option<&str>,
    profile: AdapterProfile,
    api_key: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let deployment_url = deployment_url
        .unwrap_or(AdapterConfig::DEFAULT_DEPLOYMENT_URL)
        .to_string();
    let has_key = api_key.is_some();

    let cfg = config::ConfigFile {
        agent: config::AgentSection {
            deployment_url: Some(deployment_url.clone()),
            profile: Some(profile),
        },
        provider: config::ProviderSection { api_key },
        ..Default::default()
    };

    config::save_config_to(&cfg, &path)?;

    println!("Config written to {}", path.display());
    println!("  agent.deployment_url = {deployment_url}");
    println!("  agent.profile = {profile}");
    if has_key {
        println!("  provider.api_key = <set>");
    } else if profile.credential_required() {
        println!();
        println!("Note: the {profile} profile needs OPENAI_API_KEY set before `chatgate serve`.");
    }

    Ok(())
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The chat surface owns the terminal; keep log output down to warnings
    // unless RUST_LOG asks for more.
    let default_filter = match cli.command {
        Commands::Chat { .. } => "warn",
        _ => "info",
    };
    init_tracing(default_filter);

    match cli.command {
        Commands::Init {
            profile,
            api_key,
            force,
        } => {
            cmd_init(cli.deployment_url.as_deref(), profile, api_key, force)?;
        }
        Commands::Serve {
            bind,
            port,
            profile,
        } => {
            let overrides = CliOverrides {
                deployment_url: cli.deployment_url,
                profile,
                bind,
                port,
                ..Default::default()
            };
            let resolved = ChatgateConfig::resolve(&overrides)?;
            let adapter = RequestAdapter::from_config(&resolved.adapter)
                .context("failed to build request adapter")?;
            let state = serve_cmd::AppState::new(adapter, resolved.adapter.registry());
            serve_cmd::run_serve(state, &resolved.bind, resolved.port).await?;
        }
        Commands::Chat { mode } => {
            let overrides = CliOverrides {
                deployment_url: cli.deployment_url,
                mode,
                ..Default::default()
            };
            let resolved = ChatgateConfig::resolve(&overrides)?;
            tui::run_chat(resolved.labels, resolved.initial_mode)?;
        }
    }

    Ok(())
}
