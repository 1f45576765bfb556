//! Server binary: wires the local filesystem backend, the OpenAI-compatible
//! chat client and the orchestrator together behind the HTTP surface.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mcp_file_agent::backend::LocalFsBackend;
use mcp_file_agent::chat::OpenAiChatModel;
use mcp_file_agent::orchestrator::Orchestrator;
use mcp_file_agent::server::{self, AppState};
use mcp_file_agent::AgentConfig;

#[derive(Debug, Parser)]
#[command(name = "file-agent-server", version, about = "Function-calling file agent")]
struct Args {
    /// Address to bind, e.g. 127.0.0.1:8000 (overrides FILE_AGENT_BIND)
    #[arg(long)]
    bind: Option<String>,

    /// Default model for requests that do not name one (overrides FILE_AGENT_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Default round-trip bound (overrides FILE_AGENT_MAX_ITERATIONS)
    #[arg(long)]
    max_iterations: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = AgentConfig::from_env();
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(max) = args.max_iterations {
        config.max_iterations = max;
    }

    let chat = OpenAiChatModel::with_timeout(
        config.base_url.clone(),
        config.api_key.clone(),
        config.http_timeout,
    )
    .context("building chat client")?;

    let orchestrator = Orchestrator::new(Arc::new(chat), Arc::new(LocalFsBackend::new()))
        .await
        .context("building tool catalog")?;
    info!(tools = orchestrator.catalog().len(), model = %config.model, "agent ready");

    let state = Arc::new(AppState::new(
        orchestrator,
        config.model,
        config.max_iterations,
    ));
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!("listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
