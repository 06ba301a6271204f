pub mod config;
pub mod layers;
pub mod popup;
pub mod style;
pub mod tiles;

pub use config::{Extent, ExtentError, LatLngBounds, LngLatBounds, Renderer, ViewerConfig};
pub use layers::{GeometryFilter, GeometryType, LayerDeclaration, LayerKind};
pub use popup::popup_html;
pub use style::{StyleDescriptor, StyleRule, StyleRules};
pub use tiles::{TileCoord, TileCoordError};

/// Attribute map carried by a vector tile feature.
pub type Properties = serde_json::Map<String, serde_json::Value>;
