//! Standalone table server binary
//!
//! Usage: cargo run -p ratscrew-web --bin ratscrew-server -- --port 8080

use clap::Parser;
use ratscrew_web::{LogFormat, ServerConfig, WebServer};
use std::path::PathBuf;
use std::time::Duration;

/// Hosts a single two-seat Egyptian Ratscrew table over HTTP.
#[derive(Debug, Parser)]
#[command(name = "ratscrew-server", version)]
struct ServerArgs {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(long, short = 'p', default_value_t = 8080)]
    port: u16,

    /// Seconds of inactivity before a session is treated as departed
    #[arg(long, default_value_t = 1800, value_parser = clap::value_parser!(u64).range(1..))]
    session_ttl_secs: u64,

    /// Fixed deck seed for reproducible deals
    #[arg(long)]
    seed: Option<u64>,

    /// Append accepted actions to this JSONL file
    #[arg(long)]
    action_log: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

impl ServerArgs {
    fn into_config(self) -> ServerConfig {
        let mut config = ServerConfig::new(self.host, self.port)
            .with_session_ttl(Duration::from_secs(self.session_ttl_secs));
        if let Some(seed) = self.seed {
            config = config.with_deck_seed(seed);
        }
        if let Some(path) = self.action_log {
            config = config.with_action_log(path);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = ServerArgs::parse();
    ratscrew_web::init_logging(args.log_format)?;

    let config = args.into_config();
    tracing::info!(
        host = config.host(),
        port = config.port(),
        session_ttl_secs = config.session_ttl().as_secs(),
        seeded = config.deck_seed().is_some(),
        "starting ratscrew table server"
    );

    let server = WebServer::new(config)?;
    let handle = server.start().await?;

    println!("\nTable running at http://{}", handle.address());
    println!("   Press Ctrl+C to stop\n");

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down server");
    handle.context().table().metrics().log_metrics();
    handle.shutdown().await?;
    tracing::info!("server stopped cleanly");

    Ok(())
}
