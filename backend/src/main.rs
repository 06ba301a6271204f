// main.rs

mod browser;
mod cli;
mod map;
mod state;
mod web;

use crate::cli::Options;
use crate::map::{TileSource, ensure_tiles};
use crate::state::AppState;
use anyhow::Context;
use clap::Parser;
use mvtshow_shared::Renderer;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opts = Options::parse();
    init_tracing(opts.verbose);

    let config = opts.viewer_config();
    if config.renderer == Renderer::Leaflet && config.popups_enabled() {
        warn!("--label has no effect with the leaflet renderer, use --renderer maplibre");
    }

    let tiles = opts.tile_source()?;
    match &tiles {
        TileSource::Directory(root) => {
            if let Err(e) = ensure_tiles(root).await {
                warn!("{e:#}");
            }
        }
        TileSource::Upstream { template, .. } => info!(%template, "proxying tiles"),
    }

    let state = Arc::new(AppState { config, tiles });
    let app = web::router(state, &opts.static_dir);

    let addr = SocketAddr::new(opts.host, opts.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let url = browser::viewer_url(listener.local_addr()?);
    info!("map viewer listening on {url}");

    if !opts.no_browser {
        browser::open(&url);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        // keep serving instead of shutting down right away
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
