// Run and routing helpers (build_router, run_server).

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use owo_colors::OwoColorize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::server::{http, sweeper, ws, AppState};

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(http::health_handler))
        .route("/ws", get(ws::ws_handler))
        .route(
            "/api/games",
            post(http::create_handler).get(http::list_handler),
        )
        .route("/api/games/:id", get(http::get_handler))
        .route("/api/games/:id/join", post(http::join_handler))
        .route("/api/games/:id/move", post(http::move_handler))
        .route("/api/players/:id/stats", get(http::stats_handler))
        .route("/api/leaderboard", get(http::leaderboard_handler))
        .route("/api/statistics", get(http::statistics_handler));

    // Serve a browser UI from disk when one is configured.
    let app = match &state.config.static_dir {
        Some(dir) => {
            tracing::info!(static_dir = %dir.display(), "serving static files");
            api.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true))
        }
        None => api,
    };

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = build_router(state.clone());

    // Evict old concluded sessions in the background.
    {
        let state_clone = state.clone();
        tokio::spawn(async move {
            sweeper::run_sweeper(state_clone).await;
        });
    }

    let display_addr = if addr.ip().is_loopback() {
        format!("localhost:{}", addr.port())
    } else {
        addr.to_string()
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", display_addr))?;

    tracing::info!(display_addr = %display_addr, "tic tac toe relay running");
    println!("\n{}", "=== Relay Available ===".bold().cyan());
    println!(
        "{}       {}",
        "REST:".bold(),
        format!("http://{}/api/games", display_addr).underline().blue()
    );
    println!(
        "{}  {}",
        "WebSocket:".bold(),
        format!("ws://{}/ws", display_addr).underline().blue()
    );
    if let Some(path) = &state.config_path {
        println!("{}     {}", "Config:".bold(), path.display());
    }
    println!("{}\n", "=======================".bold().cyan());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
