//! HeritageBox chat backend entry point.
//!
//! Binary name: `hbx`
//!
//! Parses CLI arguments, reads upstream credentials from the environment,
//! wires the services, spawns the session expiry sweeper, and serves the
//! HTTP API.

mod http;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use heritagebox_core::session::{SESSION_MAX_AGE, SWEEP_INTERVAL, SessionStore};
use heritagebox_infra::config::AppConfig;

use state::AppState;

#[derive(Parser)]
#[command(name = "hbx", about = "HeritageBox chat backend", version)]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8787, env = "PORT")]
    port: u16,

    /// Increase log verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,heritagebox=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let config = AppConfig::from_env();
    let state = AppState::init(&config);

    // Background sweep: sessions idle past the max age are reaped, along
    // with their thread mappings.
    let store = state.store.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        // The first tick fires immediately; nothing can be stale yet.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = store.expire_older_than(SESSION_MAX_AGE).await;
            if removed > 0 {
                tracing::info!(removed, "expired idle sessions");
            }
        }
    });

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "chat backend listening");

    axum::serve(listener, http::router::build_router(state)).await?;

    Ok(())
}
