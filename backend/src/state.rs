use crate::map::TileSource;
use mvtshow_shared::ViewerConfig;

pub struct AppState {
    /// Served verbatim at /map.json
    pub config: ViewerConfig,

    /// Backing store for /tiles/...
    pub tiles: TileSource,
}
