use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rendering library used by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Renderer {
    /// Leaflet with VectorGrid drawing tiles onto canvas elements.
    #[default]
    Leaflet,
    /// MapLibre GL drawing tiles with WebGL.
    Maplibre,
}

impl Renderer {
    pub const ALL: [Renderer; 2] = [Renderer::Leaflet, Renderer::Maplibre];

    pub fn as_str(self) -> &'static str {
        match self {
            Renderer::Leaflet => "leaflet",
            Renderer::Maplibre => "maplibre",
        }
    }

    pub fn parse(name: &str) -> Option<Renderer> {
        Self::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

impl fmt::Display for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ExtentError {
    #[error("expected 4 comma separated numbers (minx,miny,maxx,maxy), got {0}")]
    Arity(usize),
    #[error("invalid coordinate {0:?}")]
    Number(String),
    #[error("coordinates must be finite")]
    NotFinite,
    #[error("minimum {axis} ({min}) is greater than maximum {axis} ({max})")]
    Inverted { axis: char, min: f64, max: f64 },
}

/// Geographic extent of the data, x = longitude and y = latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl Extent {
    /// The square web mercator world.
    pub const WORLD: Extent = Extent {
        minx: -180.0,
        miny: -85.0511,
        maxx: 180.0,
        maxy: 85.0511,
    };

    pub fn new(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Result<Self, ExtentError> {
        if ![minx, miny, maxx, maxy].iter().all(|v| v.is_finite()) {
            return Err(ExtentError::NotFinite);
        }
        if minx > maxx {
            return Err(ExtentError::Inverted { axis: 'x', min: minx, max: maxx });
        }
        if miny > maxy {
            return Err(ExtentError::Inverted { axis: 'y', min: miny, max: maxy });
        }
        Ok(Self { minx, miny, maxx, maxy })
    }

    /// Corners as `[[lat, lng], [lat, lng]]`, the order Leaflet expects.
    pub fn lat_lng_bounds(&self) -> LatLngBounds {
        LatLngBounds([[self.miny, self.minx], [self.maxy, self.maxx]])
    }

    /// Corners as `[[lng, lat], [lng, lat]]`, the order MapLibre expects.
    pub fn lng_lat_bounds(&self) -> LngLatBounds {
        LngLatBounds([[self.minx, self.miny], [self.maxx, self.maxy]])
    }
}

impl FromStr for Extent {
    type Err = ExtentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ExtentError::Arity(parts.len()));
        }
        let mut values = [0.0f64; 4];
        for (slot, raw) in values.iter_mut().zip(&parts) {
            *slot = raw
                .parse::<f64>()
                .map_err(|_| ExtentError::Number(raw.to_string()))?;
        }
        Extent::new(values[0], values[1], values[2], values[3])
    }
}

/// South-west and north-east corners in latitude, longitude order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLngBounds(pub [[f64; 2]; 2]);

/// South-west and north-east corners in longitude, latitude order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LngLatBounds(pub [[f64; 2]; 2]);

/// Shape of `/map.json` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireViewerConfig {
    minx: f64,
    miny: f64,
    maxx: f64,
    maxy: f64,
    #[serde(default)]
    renderer: Option<String>,
    #[serde(default)]
    label_properties: Option<Vec<String>>,
}

/// Configuration served at `/map.json` and consumed by the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireViewerConfig", into = "WireViewerConfig")]
pub struct ViewerConfig {
    pub extent: Extent,
    pub renderer: Renderer,
    /// Feature properties listed in click popups, in display order.
    pub label_properties: Vec<String>,
    /// Renderer name that was not recognized and replaced by the default.
    pub unrecognized_renderer: Option<String>,
}

impl ViewerConfig {
    pub fn new(extent: Extent, renderer: Renderer, label_properties: Vec<String>) -> Self {
        Self {
            extent,
            renderer,
            label_properties,
            unrecognized_renderer: None,
        }
    }

    pub fn popups_enabled(&self) -> bool {
        !self.label_properties.is_empty()
    }
}

impl From<WireViewerConfig> for ViewerConfig {
    fn from(wire: WireViewerConfig) -> Self {
        let (renderer, unrecognized_renderer) = match wire.renderer {
            None => (Renderer::default(), None),
            Some(name) => match Renderer::parse(&name) {
                Some(r) => (r, None),
                None => (Renderer::default(), Some(name)),
            },
        };

        Self {
            extent: Extent {
                minx: wire.minx,
                miny: wire.miny,
                maxx: wire.maxx,
                maxy: wire.maxy,
            },
            renderer,
            label_properties: wire.label_properties.unwrap_or_default(),
            unrecognized_renderer,
        }
    }
}

impl From<ViewerConfig> for WireViewerConfig {
    fn from(cfg: ViewerConfig) -> Self {
        Self {
            minx: cfg.extent.minx,
            miny: cfg.extent.miny,
            maxx: cfg.extent.maxx,
            maxy: cfg.extent.maxy,
            renderer: Some(cfg.renderer.as_str().to_string()),
            label_properties: Some(cfg.label_properties),
        }
    }
}
