//! Rewriting Reverse-Proxy Gateway
//!
//! Serves an internal origin application as if it lived on the public host.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────────┐
//!                         │                      GATEWAY                          │
//!                         │                                                       │
//!     Client Request      │  ┌─────────┐    ┌──────────────┐    ┌─────────────┐  │
//!     ────────────────────┼─▶│  http   │───▶│   request    │───▶│   hyper     │──┼──▶ Origin
//!                         │  │ server  │    │ target+hdrs  │    │   client    │  │
//!                         │  └────┬────┘    └──────────────┘    └──────┬──────┘  │
//!                         │       │ OPTIONS → 204                      │         │
//!                         │       ▼                                    ▼         │
//!     Client Response     │  ┌─────────┐    ┌──────────────────────────────────┐ │
//!     ◀───────────────────┼──│response │◀───│ rewrite: cookies · redirect ·    │◀┼─── Origin
//!                         │  │         │    │          html (or stream as-is)  │ │
//!                         │  └─────────┘    └──────────────────────────────────┘ │
//!                         │                                                       │
//!                         │  config · observability · resilience · lifecycle      │
//!                         └──────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use rewriting_proxy::config::{load_config, GatewayConfig, LogFormat};
use rewriting_proxy::lifecycle::signals::spawn_signal_listener;
use rewriting_proxy::observability::{logging, metrics};
use rewriting_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "rewriting-proxy")]
#[command(about = "Reverse proxy that serves an origin application under a public host", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,

    /// Override `gateway.origin`.
    #[arg(long)]
    origin: Option<String>,

    /// Override `gateway.public_host`.
    #[arg(long)]
    public_host: Option<String>,

    /// Override `observability.log_format`.
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn into_config(self) -> Result<GatewayConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GatewayConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(origin) = self.origin {
            config.gateway.origin = origin;
        }
        if let Some(public_host) = self.public_host {
            config.gateway.public_host = public_host;
        }
        if let Some(log_format) = self.log_format {
            config.observability.log_format = log_format;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability);

    tracing::info!("rewriting-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    let server = HttpServer::new(config.clone())?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    spawn_signal_listener(shutdown);

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
