//! What the viewer will build, decided once from the config.
//!
//! A plan is plain data: the bounds in the axis order its renderer expects,
//! the tile source, the layers in stacking order and the interaction wiring.
//! Engines turn a plan into a live map.

use mvtshow_shared::layers::vector_layers;
use mvtshow_shared::tiles::{MAP_CONTAINER_ID, TILE_LAYER, TILE_URL_TEMPLATE};
use mvtshow_shared::{
    LatLngBounds, LayerDeclaration, LayerKind, LngLatBounds, Renderer, StyleRules, ViewerConfig,
};
use serde_json::{Value, json};

const BACKGROUND_COLOR: &str = "#f8f4f0";

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerPlan {
    Canvas(CanvasPlan),
    Vector(VectorPlan),
}

impl ViewerPlan {
    pub fn for_config(config: &ViewerConfig) -> Self {
        match config.renderer {
            Renderer::Leaflet => ViewerPlan::Canvas(CanvasPlan::new(config)),
            Renderer::Maplibre => ViewerPlan::Vector(VectorPlan::new(config)),
        }
    }

    pub fn renderer(&self) -> Renderer {
        match self {
            ViewerPlan::Canvas(_) => Renderer::Leaflet,
            ViewerPlan::Vector(_) => Renderer::Maplibre,
        }
    }
}

/// Leaflet + VectorGrid drawing onto canvas tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasPlan {
    pub container: String,
    pub bounds: LatLngBounds,
    pub tile_url: String,
    pub styles: StyleRules,
    /// Log clicked features to the console. Leaflet never opens popups.
    pub log_clicks: bool,
}

impl CanvasPlan {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            container: MAP_CONTAINER_ID.to_string(),
            bounds: config.extent.lat_lng_bounds(),
            tile_url: TILE_URL_TEMPLATE.to_string(),
            styles: StyleRules::default(),
            log_clicks: config.popups_enabled(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorSource {
    pub id: String,
    pub tiles: Vec<String>,
}

impl VectorSource {
    pub fn to_style_source(&self) -> Value {
        json!({ "type": "vector", "tiles": self.tiles })
    }
}

/// Click-to-popup wiring for the vector renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupBinding {
    pub layers: Vec<String>,
    pub label_properties: Vec<String>,
}

/// MapLibre GL. Sources and layers are only added once the map has loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorPlan {
    pub container: String,
    pub bounds: LngLatBounds,
    pub background: LayerDeclaration,
    pub source: VectorSource,
    /// Bottom to top.
    pub layers: Vec<LayerDeclaration>,
    pub popup: Option<PopupBinding>,
    pub hover_layers: Vec<String>,
}

impl VectorPlan {
    pub fn new(config: &ViewerConfig) -> Self {
        let styles = StyleRules::default();
        let style = styles
            .get(TILE_LAYER)
            .map(|rule| rule.descriptor().clone())
            .unwrap_or_default();
        let layers = vector_layers(TILE_LAYER, TILE_LAYER, &style);

        // Topmost first, matching the order MapLibre dispatches events in.
        let interactive: Vec<String> = layers
            .iter()
            .rev()
            .filter(|l| matches!(l.kind, LayerKind::Fill | LayerKind::Circle))
            .map(|l| l.id.clone())
            .collect();

        let popup = config.popups_enabled().then(|| PopupBinding {
            layers: interactive.clone(),
            label_properties: config.label_properties.clone(),
        });

        Self {
            container: MAP_CONTAINER_ID.to_string(),
            bounds: config.extent.lng_lat_bounds(),
            background: LayerDeclaration::background("background", BACKGROUND_COLOR),
            source: VectorSource {
                id: TILE_LAYER.to_string(),
                tiles: vec![TILE_URL_TEMPLATE.to_string()],
            },
            layers,
            popup,
            hover_layers: interactive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvtshow_shared::{Extent, GeometryFilter};

    fn config(renderer: Renderer, labels: &[&str]) -> ViewerConfig {
        ViewerConfig::new(
            Extent::new(-122.52, 37.70, -122.35, 37.83).unwrap(),
            renderer,
            labels.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn leaflet_gets_a_canvas_plan_in_lat_lng_order() {
        let plan = ViewerPlan::for_config(&config(Renderer::Leaflet, &[]));
        let ViewerPlan::Canvas(canvas) = plan else {
            panic!("expected a canvas plan");
        };
        assert_eq!(canvas.bounds.0, [[37.70, -122.52], [37.83, -122.35]]);
        assert_eq!(canvas.tile_url, "/tiles/all/{z}/{x}/{y}.mvt");
        assert_eq!(canvas.container, "map");
        assert!(!canvas.log_clicks);
    }

    #[test]
    fn unrecognized_renderer_gets_a_canvas_plan() {
        let cfg: ViewerConfig = serde_json::from_str(
            r#"{"minx":1,"miny":2,"maxx":3,"maxy":4,"renderer":"cesium"}"#,
        )
        .unwrap();
        let plan = ViewerPlan::for_config(&cfg);
        assert_eq!(plan.renderer(), Renderer::Leaflet);
        let ViewerPlan::Canvas(canvas) = plan else {
            panic!("expected a canvas plan");
        };
        assert_eq!(canvas.bounds.0, [[2.0, 1.0], [4.0, 3.0]]);
    }

    #[test]
    fn maplibre_gets_a_vector_plan_in_lng_lat_order() {
        let plan = ViewerPlan::for_config(&config(Renderer::Maplibre, &["name"]));
        let ViewerPlan::Vector(vector) = plan else {
            panic!("expected a vector plan");
        };
        assert_eq!(vector.bounds.0, [[-122.52, 37.70], [-122.35, 37.83]]);
        assert_eq!(vector.source.id, "all");
        assert_eq!(vector.source.tiles, vec!["/tiles/all/{z}/{x}/{y}.mvt".to_string()]);
    }

    #[test]
    fn vector_layers_stack_circle_line_fill() {
        let ViewerPlan::Vector(vector) = ViewerPlan::for_config(&config(Renderer::Maplibre, &[]))
        else {
            panic!("expected a vector plan");
        };
        let ids: Vec<&str> = vector.layers.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["all-circle", "all-line", "all-fill"]);
        assert_eq!(vector.layers[0].filter, Some(GeometryFilter::PointsOnly));
        for layer in &vector.layers {
            assert_eq!(layer.source.as_deref(), Some("all"));
            assert_eq!(layer.source_layer.as_deref(), Some("all"));
        }
        assert_eq!(vector.hover_layers, vec!["all-fill", "all-circle"]);
    }

    #[test]
    fn popups_only_with_label_properties() {
        let ViewerPlan::Vector(without) = ViewerPlan::for_config(&config(Renderer::Maplibre, &[]))
        else {
            panic!("expected a vector plan");
        };
        assert!(without.popup.is_none());

        let ViewerPlan::Vector(with) =
            ViewerPlan::for_config(&config(Renderer::Maplibre, &["name", "type"]))
        else {
            panic!("expected a vector plan");
        };
        let popup = with.popup.expect("popup binding");
        assert_eq!(popup.layers, vec!["all-fill", "all-circle"]);
        assert_eq!(popup.label_properties, vec!["name", "type"]);
    }

    #[test]
    fn leaflet_logs_clicks_when_labels_are_set() {
        let ViewerPlan::Canvas(canvas) =
            ViewerPlan::for_config(&config(Renderer::Leaflet, &["name"]))
        else {
            panic!("expected a canvas plan");
        };
        assert!(canvas.log_clicks);
    }
}
