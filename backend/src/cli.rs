use crate::map::TileSource;
use clap::{Args, Parser, ValueEnum};
use mvtshow_shared::{Extent, Renderer, ViewerConfig};
use std::net::IpAddr;
use std::path::PathBuf;

/// Command-line tool for serving Mapbox Vector Tiles from an on-demand web server
/// and exploring them in the browser.
#[derive(Debug, Parser)]
#[command(name = "mvtshow", version)]
pub struct Options {
    /// Address to listen on.
    #[arg(long, env = "MVTSHOW_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// The port number to listen for requests on. If 0 a free port is chosen.
    #[arg(long, env = "MVTSHOW_PORT", default_value_t = 0)]
    pub port: u16,

    /// Which rendering library draws the vector tiles.
    #[arg(long, env = "MVTSHOW_RENDERER", value_enum, default_value_t = RendererArg::Leaflet)]
    pub renderer: RendererArg,

    /// Feature property to show in the popup of a clicked feature. Repeatable.
    #[arg(
        long = "label",
        env = "MVTSHOW_LABELS",
        value_name = "PROPERTY",
        value_delimiter = ','
    )]
    pub labels: Vec<String>,

    /// Initial map extent as minx,miny,maxx,maxy in degrees.
    #[arg(
        long,
        env = "MVTSHOW_BOUNDS",
        value_name = "MINX,MINY,MAXX,MAXY",
        default_value = "-180,-85.0511,180,85.0511",
        allow_hyphen_values = true
    )]
    pub bounds: Extent,

    #[command(flatten)]
    pub tiles: TileArgs,

    /// Directory holding the viewer page and its assets.
    #[arg(long, env = "MVTSHOW_STATIC_DIR", default_value = "./frontend/dist")]
    pub static_dir: PathBuf,

    /// Do not open the viewer in the default web browser.
    #[arg(long, env = "MVTSHOW_NO_BROWSER")]
    pub no_browser: bool,

    /// Enable verbose (debug) logging.
    #[arg(short, long, env = "MVTSHOW_VERBOSE")]
    pub verbose: bool,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct TileArgs {
    /// Directory of pre-built tiles laid out as {layer}/{z}/{x}/{y}.mvt.
    #[arg(long, env = "MVTSHOW_TILES_DIR")]
    pub tiles_dir: Option<PathBuf>,

    /// Upstream tile URL template with {layer}, {z}, {x} and {y} placeholders.
    #[arg(long, env = "MVTSHOW_TILES_URL")]
    pub tiles_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererArg {
    Leaflet,
    Maplibre,
}

impl From<RendererArg> for Renderer {
    fn from(arg: RendererArg) -> Self {
        match arg {
            RendererArg::Leaflet => Renderer::Leaflet,
            RendererArg::Maplibre => Renderer::Maplibre,
        }
    }
}

impl Options {
    pub fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig::new(self.bounds, self.renderer.into(), self.labels.clone())
    }

    pub fn tile_source(&self) -> anyhow::Result<TileSource> {
        match (&self.tiles.tiles_dir, &self.tiles.tiles_url) {
            (Some(dir), None) => Ok(TileSource::directory(dir.clone())),
            (None, Some(url)) => TileSource::upstream(url),
            _ => anyhow::bail!("exactly one of --tiles-dir and --tiles-url is required"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options, clap::Error> {
        Options::try_parse_from(std::iter::once("mvtshow").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let opts = parse(&["--tiles-dir", "tiles"]).unwrap();
        assert_eq!(opts.port, 0);
        assert_eq!(opts.host.to_string(), "127.0.0.1");
        assert_eq!(opts.renderer, RendererArg::Leaflet);
        assert!(opts.labels.is_empty());
        assert_eq!(opts.bounds, Extent::WORLD);
        assert!(!opts.verbose);
        assert!(!opts.no_browser);

        let cfg = opts.viewer_config();
        assert_eq!(cfg.renderer, Renderer::Leaflet);
        assert!(!cfg.popups_enabled());
        assert!(matches!(opts.tile_source().unwrap(), TileSource::Directory(_)));
    }

    #[test]
    fn labels_renderer_and_bounds() {
        let opts = parse(&[
            "--tiles-url",
            "http://localhost:9000/{layer}/{z}/{x}/{y}.mvt",
            "--renderer",
            "maplibre",
            "--label",
            "name",
            "--label",
            "type",
            "--bounds",
            "-122.52,37.70,-122.35,37.83",
        ])
        .unwrap();

        let cfg = opts.viewer_config();
        assert_eq!(cfg.renderer, Renderer::Maplibre);
        assert_eq!(cfg.label_properties, vec!["name", "type"]);
        assert_eq!(cfg.extent, Extent::new(-122.52, 37.70, -122.35, 37.83).unwrap());
        assert!(matches!(opts.tile_source().unwrap(), TileSource::Upstream { .. }));
    }

    #[test]
    fn labels_split_on_commas() {
        let opts = parse(&["--tiles-dir", "t", "--label", "name,type", "--no-browser"]).unwrap();
        assert_eq!(opts.labels, vec!["name", "type"]);
        assert!(opts.no_browser);
    }

    #[test]
    fn rejects_unknown_renderer() {
        assert!(parse(&["--tiles-dir", "t", "--renderer", "openlayers"]).is_err());
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(parse(&["--tiles-dir", "t", "--bounds", "10,0,-10,5"]).is_err());
    }

    #[test]
    fn needs_exactly_one_tile_source() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--tiles-dir", "t", "--tiles-url", "http://x/{z}/{x}/{y}"]).is_err());
    }

    #[test]
    fn upstream_template_needs_placeholders() {
        let opts = parse(&["--tiles-url", "http://localhost:9000/tiles"]).unwrap();
        assert!(opts.tile_source().is_err());
    }
}
