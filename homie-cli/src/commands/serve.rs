//! HTTP server command for the catalog API

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use homie_server::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Config file (default: ./homie.toml when present)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Address to bind to (default: 127.0.0.1:3030)
    #[arg(long, short = 'b', env = "HOMIE_BIND")]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl ServeArgs {
    /// Layer command-line flags over the loaded config.
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if self.cors_permissive {
            config.cors_permissive = true;
        }
        if let Some(url) = self.database_url {
            config.database_url = Some(url);
        }
        if let Some(max) = self.max_connections {
            config.max_connections = max;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        config
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = ServerConfig::load(args.config.as_deref()).context("Failed to load config")?;
    let config = args.apply(config);

    tracing::info!("Starting homie server on {}", config.bind_addr);

    // Blocks until shutdown
    run_server(config).await.context("Server error")?;

    Ok(())
}
