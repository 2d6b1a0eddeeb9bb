//! Keep a C•CURE session alive on a fixed interval.
//!
//! Reads the account from `CCURE_*` environment variables, logs in, and
//! pings the keepalive endpoint until interrupted. A failed ping logs out;
//! the next tick logs in again.
//!
//! ```sh
//! export CCURE_BASE_URL=https://ccure.example.com
//! export CCURE_USERNAME=... CCURE_PASSWORD=...
//! export CCURE_CLIENT_NAME=... CCURE_CLIENT_VERSION=... CCURE_CLIENT_ID=...
//! RUST_LOG=info cargo run --bin ccure-keepalive
//! ```
//!
//! `CCURE_KEEPALIVE_SECS` sets the interval (default 60).

use std::time::Duration;

use acslib::{CcureConfig, SessionConnection};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = CcureConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let interval = match std::env::var("CCURE_KEEPALIVE_SECS") {
        Ok(secs) => match secs.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                eprintln!("Error: CCURE_KEEPALIVE_SECS must be a positive number of seconds");
                std::process::exit(1);
            }
        },
        Err(_) => DEFAULT_INTERVAL,
    };

    let connection = SessionConnection::new(config).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    if let Err(e) = connection.login().await {
        eprintln!("Error: Failed to log in: {e}");
        std::process::exit(1);
    }
    match connection.versions().await {
        Ok(versions) => info!(
            web_service = versions.web_service_version.as_deref().unwrap_or("unknown"),
            app_server = versions.app_server_version.as_deref().unwrap_or("unknown"),
            "Connected"
        ),
        Err(e) => info!(error = %e, "Connected; server versions unavailable"),
    }

    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately; the session is fresh.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match connection.keepalive().await {
                    Ok(()) => info!("Session kept alive"),
                    Err(e) => error!(error = %e, status = e.status_code(), "Keepalive failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    connection.logout().await;
}
