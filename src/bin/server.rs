//! Multi-user 2048 game server.
//!
//! Reads `TUI2048_*` environment variables first; command-line flags override them.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tui_2048::adapter::{run_server, ServerConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Line-delimited JSON 2048 server")]
struct Args {
    /// Host interface to bind (default 127.0.0.1).
    #[arg(long)]
    host: Option<String>,
    /// Port to bind (default 5001).
    #[arg(long)]
    port: Option<u16>,
    /// Largest board size a client may request (default 10).
    #[arg(long)]
    max_board_size: Option<usize>,
    /// Drop sessions idle this many seconds; 0 keeps them forever (default 3600).
    #[arg(long)]
    session_ttl_secs: Option<u64>,
    /// Live session cap; the least recently used is evicted past it (default 10000).
    #[arg(long)]
    max_sessions: Option<usize>,
    /// Tracing filter, e.g. "info", "debug", "tui_2048_adapter=debug".
    #[arg(long, default_value = "info")]
    log: String,
}

impl Args {
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(size) = self.max_board_size {
            config.session.max_board_size = size;
        }
        if let Some(secs) = self.session_ttl_secs {
            config.session.idle_ttl = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(max) = self.max_sessions {
            config.session.max_sessions = max;
        }
        config.normalized()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::registry()
        .with(EnvFilter::new(&args.log))
        .with(fmt::layer())
        .init();

    let config = args.apply(ServerConfig::from_env());
    info!(
        host = %config.host,
        port = config.port,
        max_board_size = config.session.max_board_size,
        max_sessions = config.session.max_sessions,
        idle_ttl_secs = config.session.idle_ttl.map(|d| d.as_secs()),
        "starting 2048 server"
    );

    run_server(config, None, shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
