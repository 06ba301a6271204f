// frontend/src/loader.rs

use crate::error::ViewerError;
use mvtshow_shared::ViewerConfig;
use mvtshow_shared::tiles::CONFIG_PATH;
use serde::de::DeserializeOwned;

/// Where the viewer gets its configuration from.
#[allow(async_fn_in_trait)]
pub trait ConfigSource {
    async fn fetch_config(&self) -> Result<ViewerConfig, ViewerError>;
}

/// Fetches `/map.json` once. No retries and no timeout.
#[derive(Debug, Clone, Default)]
pub struct HttpConfigSource {
    /// Origin to fetch from. `None` means the page origin.
    base: Option<String>,
}

impl HttpConfigSource {
    pub fn same_origin() -> Self {
        Self { base: None }
    }

    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    pub fn url(&self) -> Result<String, ViewerError> {
        let base = match &self.base {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => page_origin()?,
        };
        Ok(format!("{base}{CONFIG_PATH}"))
    }
}

impl ConfigSource for HttpConfigSource {
    async fn fetch_config(&self) -> Result<ViewerConfig, ViewerError> {
        let url = self.url()?;
        log::debug!("fetching map config from {url}");
        http_get_json(&url).await
    }
}

// ---------- HTTP helpers ----------
#[cfg(target_arch = "wasm32")]
fn page_origin() -> Result<String, ViewerError> {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .ok_or(ViewerError::NoOrigin)
}

#[cfg(not(target_arch = "wasm32"))]
fn page_origin() -> Result<String, ViewerError> {
    Err(ViewerError::NoOrigin)
}

#[cfg(target_arch = "wasm32")]
async fn http_get_json<T: DeserializeOwned>(url: &str) -> Result<T, ViewerError> {
    use gloo_net::http::Request;

    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| ViewerError::Transport(e.to_string()))?;

    if !resp.ok() {
        return Err(ViewerError::Status(resp.status()));
    }

    let body = resp
        .text()
        .await
        .map_err(|e| ViewerError::Transport(e.to_string()))?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(not(target_arch = "wasm32"))]
async fn http_get_json<T: DeserializeOwned>(url: &str) -> Result<T, ViewerError> {
    let resp = reqwest::get(url)
        .await
        .map_err(|e| ViewerError::Transport(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ViewerError::Status(status.as_u16()));
    }

    let body = resp
        .text()
        .await
        .map_err(|e| ViewerError::Transport(e.to_string()))?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use mvtshow_shared::Renderer;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn url_joins_base_and_config_path() {
        let src = HttpConfigSource::with_base("http://localhost:8080/");
        assert_eq!(src.url().unwrap(), "http://localhost:8080/map.json");
    }

    #[test]
    fn same_origin_needs_a_page_natively() {
        assert!(matches!(
            HttpConfigSource::same_origin().url(),
            Err(ViewerError::NoOrigin)
        ));
    }

    #[tokio::test]
    async fn fetches_and_parses_config() {
        let app = Router::new().route(
            "/map.json",
            get(|| async {
                r#"{"minx":-122.5,"miny":37.6,"maxx":-122.3,"maxy":37.8,"renderer":"maplibre","label_properties":["name"]}"#
            }),
        );
        let base = serve(app).await;

        let cfg = HttpConfigSource::with_base(base).fetch_config().await.unwrap();
        assert_eq!(cfg.renderer, Renderer::Maplibre);
        assert_eq!(cfg.label_properties, vec!["name".to_string()]);
        assert_eq!(cfg.extent.minx, -122.5);
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let app = Router::new().route(
            "/map.json",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = serve(app).await;

        let err = HttpConfigSource::with_base(base)
            .fetch_config()
            .await
            .unwrap_err();
        assert!(matches!(err, ViewerError::Status(500)), "got {err:?}");
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let app = Router::new().route("/map.json", get(|| async { "{\"minx\": " }));
        let base = serve(app).await;

        let err = HttpConfigSource::with_base(base)
            .fetch_config()
            .await
            .unwrap_err();
        assert!(matches!(err, ViewerError::Parse(_)), "got {err:?}");
    }
}
