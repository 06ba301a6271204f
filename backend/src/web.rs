use crate::map::{Tile, TileError};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use mvtshow_shared::tiles::{CONFIG_PATH, MVT_CONTENT_TYPE, check_layer_name};
use mvtshow_shared::{TileCoord, ViewerConfig};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Public router constructor
pub fn router(state: Arc<AppState>, static_dir: &std::path::Path) -> Router {
    let static_files = ServeDir::new(static_dir)
        .precompressed_br()
        .precompressed_gzip();

    Router::new()
        .route(CONFIG_PATH, get(get_config))
        .route("/tiles/{layer}/{z}/{x}/{y}", get(get_tile))
        .route("/healthz", get(healthz))
        // the viewer page, its wasm bundle and vendored scripts
        .fallback_service(static_files)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn get_config(State(state): State<Arc<AppState>>) -> Json<ViewerConfig> {
    Json(state.config.clone())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_tile(
    State(state): State<Arc<AppState>>,
    Path((layer, z, x, y)): Path<(String, String, String, String)>,
) -> Response {
    let coord = match check_layer_name(&layer).and_then(|_| TileCoord::parse(&z, &x, &y)) {
        Ok(coord) => coord,
        Err(e) => {
            debug!(%layer, %z, %x, %y, "rejected tile request: {e}");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    match state.tiles.fetch(&layer, coord).await {
        Ok(Some(tile)) => tile_response(tile),
        Ok(None) => {
            debug!(%layer, z = coord.z, x = coord.x, y = coord.y, "empty tile");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(TileError::UpstreamStatus(code)) => {
            debug!(%layer, z = coord.z, x = coord.x, y = coord.y, code, "upstream status relayed");
            StatusCode::from_u16(code)
                .unwrap_or(StatusCode::BAD_GATEWAY)
                .into_response()
        }
        Err(e @ TileError::Upstream(_)) => {
            error!(%layer, z = coord.z, x = coord.x, y = coord.y, "tile fetch failed: {e}");
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
        Err(e) => {
            error!(%layer, z = coord.z, x = coord.x, y = coord.y, "tile read failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn tile_response(tile: Tile) -> Response {
    let mut resp = ([(header::CONTENT_TYPE, MVT_CONTENT_TYPE)], tile.data).into_response();
    if let Some(encoding) = tile
        .content_encoding
        .and_then(|e| header::HeaderValue::from_str(&e).ok())
    {
        resp.headers_mut().insert(header::CONTENT_ENCODING, encoding);
    }
    resp
}
