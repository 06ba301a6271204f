use axum::body::Bytes;
use mvtshow_shared::TileCoord;
use reqwest::header::CONTENT_ENCODING;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Error)]
pub enum TileError {
    #[error("failed to read tile {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("upstream answered with HTTP {0}")]
    UpstreamStatus(u16),
}

/// An encoded tile ready to be sent as is.
#[derive(Debug, Clone)]
pub struct Tile {
    pub data: Bytes,
    pub content_encoding: Option<String>,
}

/// Where tiles come from. Tiles are never built here.
#[derive(Debug, Clone)]
pub enum TileSource {
    /// Files laid out as `<root>/{layer}/{z}/{x}/{y}.mvt`.
    Directory(PathBuf),
    /// Another tile server, addressed through a URL template.
    Upstream {
        template: String,
        http: reqwest::Client,
    },
}

impl TileSource {
    pub fn directory(root: impl Into<PathBuf>) -> Self {
        TileSource::Directory(root.into())
    }

    pub fn upstream(template: &str) -> anyhow::Result<Self> {
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !template.contains(placeholder) {
                anyhow::bail!("tile URL template {template:?} is missing {placeholder}");
            }
        }
        Ok(TileSource::Upstream {
            template: template.to_string(),
            http: reqwest::Client::new(),
        })
    }

    /// `Ok(None)` means the tile does not exist and is empty.
    pub async fn fetch(&self, layer: &str, coord: TileCoord) -> Result<Option<Tile>, TileError> {
        match self {
            TileSource::Directory(root) => read_tile(&root.join(coord.path(layer))).await,
            TileSource::Upstream { template, http } => {
                fetch_upstream(http, &coord.fill_template(template, layer)).await
            }
        }
    }
}

async fn read_tile(path: &Path) -> Result<Option<Tile>, TileError> {
    match fs::read(path).await {
        Ok(data) => {
            // tippecanoe and friends write gzip compressed tiles
            let content_encoding = data.starts_with(&GZIP_MAGIC).then(|| "gzip".to_string());
            Ok(Some(Tile {
                data: Bytes::from(data),
                content_encoding,
            }))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(TileError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

async fn fetch_upstream(http: &reqwest::Client, url: &str) -> Result<Option<Tile>, TileError> {
    let resp = http.get(url).send().await?;
    let status = resp.status();

    if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::NO_CONTENT {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(TileError::UpstreamStatus(status.as_u16()));
    }

    let content_encoding = resp
        .headers()
        .get(CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let data = resp.bytes().await?;

    Ok(Some(Tile {
        data,
        content_encoding,
    }))
}

/// Warn early when the tile directory is unusable.
/// Expected layout: <root>/{layer}/{z}/{x}/{y}.mvt
pub async fn ensure_tiles(root: &Path) -> anyhow::Result<()> {
    if fs::try_exists(root).await.unwrap_or(false) {
        let mut entries = fs::read_dir(root).await?;
        if entries.next_entry().await?.is_some() {
            // Tiles exist, all good.
            return Ok(());
        }
    }

    anyhow::bail!(
        "No tiles found in {}. Every request will answer with an empty tile.",
        root.display()
    );
}
