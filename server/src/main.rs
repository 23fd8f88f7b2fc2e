//! Main entry point for the tic tac toe relay server.

use ttt_server::{cli, config, server};

use anyhow::Context;
use clap::Parser;
use config::Config;
use server::AppState;
use std::net::{IpAddr, SocketAddr, TcpListener};
use std::path::PathBuf;

/// Parse CLI args, load config and run the server.
///
/// Usage:
///   ttt-server [--config PATH] [--port N] [--ttl SECS] [--debug]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::ServerCli::parse();

    // Debug: everything at DEBUG with source locations.
    // Otherwise: our crates at INFO, everything else at WARN.
    let log_filter = if cli.debug {
        "debug".to_string()
    } else {
        "ttt_server=info,ttt_shared=info,warn".to_string()
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(cli.debug)
        .with_thread_ids(cli.debug)
        .with_file(cli.debug)
        .with_line_number(cli.debug)
        .init();

    let config_path: PathBuf = cli.config.clone();

    // Load or create config file (creates file if missing).
    let mut cfg = Config::load_or_create(&config_path)
        .with_context(|| format!("loading or creating config '{}'", config_path.display()))?;

    // CLI overrides are in-memory unless --persist is given.
    if cli.apply_overrides(&mut cfg) && cli.persist {
        cfg.save(&config_path)
            .with_context(|| format!("saving updated config '{}'", config_path.display()))?;
    }

    tracing::info!(
        config = %config_path.display(),
        concluded_ttl_secs = cfg.concluded_ttl_secs,
        "configuration loaded"
    );

    let ip = cfg.bind_addr()?;
    let port = find_available_port(ip, cfg.port)?;
    if port != cfg.port {
        tracing::warn!(
            port,
            configured = cfg.port,
            "configured port was not available, using alternative port"
        );
    }
    let addr = SocketAddr::new(ip, port);

    let state = AppState::new(cfg, Some(config_path));
    server::run_server(addr, state).await?;
    Ok(())
}

/// Find the first available port starting from the given port number
fn find_available_port(ip: IpAddr, start_port: u16) -> anyhow::Result<u16> {
    let end = start_port.saturating_add(100);
    for port in start_port..end {
        if TcpListener::bind((ip, port)).is_ok() {
            return Ok(port);
        }
    }
    Err(anyhow::anyhow!(
        "No available ports found in range {}..{}",
        start_port,
        end
    ))
}
