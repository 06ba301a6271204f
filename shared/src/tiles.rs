use thiserror::Error;

/// Name of the source layer inside every tile.
pub const TILE_LAYER: &str = "all";
pub const TILE_EXTENSION: &str = "mvt";
pub const TILE_URL_TEMPLATE: &str = "/tiles/all/{z}/{x}/{y}.mvt";
pub const MVT_CONTENT_TYPE: &str = "application/vnd.mapbox-vector-tile";

pub const CONFIG_PATH: &str = "/map.json";
/// Id of the element the map is mounted into.
pub const MAP_CONTAINER_ID: &str = "map";

pub const MAX_ZOOM: u8 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TileCoordError {
    #[error("invalid {axis} value {value:?}")]
    Number { axis: char, value: String },
    #[error("unsupported tile name {0:?}, expected <y>.mvt")]
    Extension(String),
    #[error("zoom {0} is above the maximum of {max}", max = MAX_ZOOM)]
    Zoom(u8),
    #[error("tile {x}/{y} does not exist at zoom {z}")]
    OutOfRange { z: u8, x: u32, y: u32 },
    #[error("invalid layer name {0:?}")]
    Layer(String),
}

/// Address of one tile in the XYZ scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Result<Self, TileCoordError> {
        if z > MAX_ZOOM {
            return Err(TileCoordError::Zoom(z));
        }
        let side = 1u64 << z;
        if u64::from(x) >= side || u64::from(y) >= side {
            return Err(TileCoordError::OutOfRange { z, x, y });
        }
        Ok(Self { z, x, y })
    }

    /// Parses the `{z}`, `{x}` and `{y}.mvt` segments of a tile path.
    pub fn parse(z: &str, x: &str, y_file: &str) -> Result<Self, TileCoordError> {
        let y = y_file
            .strip_suffix(TILE_EXTENSION)
            .and_then(|s| s.strip_suffix('.'))
            .ok_or_else(|| TileCoordError::Extension(y_file.to_string()))?;

        Self::new(number('z', z)?, number('x', x)?, number('y', y)?)
    }

    /// Relative file path, `{layer}/{z}/{x}/{y}.mvt`.
    pub fn path(&self, layer: &str) -> String {
        format!("{layer}/{}/{}/{}.{TILE_EXTENSION}", self.z, self.x, self.y)
    }

    /// Fills `{layer}`, `{z}`, `{x}` and `{y}` in a URL template.
    pub fn fill_template(&self, template: &str, layer: &str) -> String {
        template
            .replace("{layer}", layer)
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
    }
}

fn number<T: std::str::FromStr>(axis: char, raw: &str) -> Result<T, TileCoordError> {
    raw.parse().map_err(|_| TileCoordError::Number {
        axis,
        value: raw.to_string(),
    })
}

/// Layer names become path segments, so only `[A-Za-z0-9_-]` is allowed.
pub fn check_layer_name(name: &str) -> Result<&str, TileCoordError> {
    let ok = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if ok {
        Ok(name)
    } else {
        Err(TileCoordError::Layer(name.to_string()))
    }
}
