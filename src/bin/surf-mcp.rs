//! surf-mcp - MCP server for surf forecasts
//!
//! Serves the surf tools over streamable HTTP (default) or stdio.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

use surf_mcp::config::Transport;
use surf_mcp::mcp::McpServer;
use surf_mcp::reference::ReferenceStore;
use surf_mcp::{http, provider, telemetry, tools, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let config = ServerConfig::parse();
    telemetry::init(config.log_format);
    config.validate().context("Invalid configuration")?;

    let store = ReferenceStore::new(&config.data_dir);
    store
        .verify()
        .await
        .with_context(|| format!("Reference data in {} is not usable", config.data_dir.display()))?;

    let provider = provider::from_config(&config).context("Failed to set up forecast provider")?;
    let server = Arc::new(McpServer::new(tools::all_tools(provider, store)));
    tracing::info!(
        tools = server.tools().len(),
        provider = %config.provider,
        transport = ?config.transport,
        "Surf MCP server starting"
    );

    match config.transport {
        Transport::Http => http::serve(&config, server).await,
        Transport::Stdio => server.run_stdio().await.context("stdio transport failed"),
    }
}
