//! MapLibre layer declarations for the vector renderer.
//!
//! Declarations serialize straight into the MapLibre style specification, so
//! the viewer can pass them to `map.addLayer` unchanged. Order matters: layers
//! added later draw above earlier ones and receive pointer events first.

use crate::style::StyleDescriptor;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Fill,
    Line,
    Circle,
    Background,
}

impl LayerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LayerKind::Fill => "fill",
            LayerKind::Line => "line",
            LayerKind::Circle => "circle",
            LayerKind::Background => "background",
        }
    }
}

/// GeoJSON geometry types as reported by the `geometry-type` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
}

impl GeometryType {
    pub const ALL: [GeometryType; 6] = [
        GeometryType::Point,
        GeometryType::MultiPoint,
        GeometryType::LineString,
        GeometryType::MultiLineString,
        GeometryType::Polygon,
        GeometryType::MultiPolygon,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::LineString => "LineString",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPolygon => "MultiPolygon",
        }
    }

    pub fn parse(name: &str) -> Option<GeometryType> {
        Self::ALL.into_iter().find(|g| g.as_str() == name)
    }
}

/// Restricts a layer to a set of geometry types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFilter {
    /// Points and multipoints. Without it MapLibre draws a circle at every
    /// vertex of lines and polygons.
    PointsOnly,
}

impl GeometryFilter {
    pub fn accepted(self) -> &'static [GeometryType] {
        match self {
            GeometryFilter::PointsOnly => &[GeometryType::Point, GeometryType::MultiPoint],
        }
    }

    pub fn accepts(self, geometry: GeometryType) -> bool {
        self.accepted().contains(&geometry)
    }

    pub fn to_expression(self) -> Value {
        let names: Vec<&str> = self.accepted().iter().map(|g| g.as_str()).collect();
        json!(["match", ["geometry-type"], names, true, false])
    }
}

impl Serialize for GeometryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_expression().serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerDeclaration {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "source-layer", skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<String>,
    pub paint: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<GeometryFilter>,
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl LayerDeclaration {
    fn bound(kind: LayerKind, source: &str, source_layer: &str, paint: Value) -> Self {
        Self {
            id: format!("{source_layer}-{}", kind.as_str()),
            kind,
            source: Some(source.to_string()),
            source_layer: Some(source_layer.to_string()),
            paint: object(paint),
            layout: None,
            filter: None,
        }
    }

    /// Circles for point geometries only.
    pub fn circle(source: &str, source_layer: &str, style: &StyleDescriptor) -> Self {
        let mut layer = Self::bound(
            LayerKind::Circle,
            source,
            source_layer,
            json!({
                "circle-radius": style.radius,
                "circle-color": style.fill_color,
                "circle-opacity": style.fill_opacity,
                "circle-stroke-color": style.color,
                "circle-stroke-width": style.weight,
                "circle-stroke-opacity": style.opacity,
            }),
        );
        layer.filter = Some(GeometryFilter::PointsOnly);
        layer
    }

    pub fn line(source: &str, source_layer: &str, style: &StyleDescriptor) -> Self {
        let mut layer = Self::bound(
            LayerKind::Line,
            source,
            source_layer,
            json!({
                "line-color": style.color,
                "line-width": style.weight,
                "line-opacity": style.opacity,
            }),
        );
        layer.layout = Some(object(json!({
            "line-join": "round",
            "line-cap": "round",
        })));
        layer
    }

    pub fn fill(source: &str, source_layer: &str, style: &StyleDescriptor) -> Self {
        let fill_opacity = if style.fill { style.fill_opacity } else { 0.0 };
        Self::bound(
            LayerKind::Fill,
            source,
            source_layer,
            json!({
                "fill-color": style.fill_color,
                "fill-opacity": fill_opacity,
                "fill-outline-color": style.color,
            }),
        )
    }

    pub fn background(id: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: LayerKind::Background,
            source: None,
            source_layer: None,
            paint: object(json!({ "background-color": color })),
            layout: None,
            filter: None,
        }
    }
}

/// The circle, line and fill layers for one source layer, bottom to top.
pub fn vector_layers(
    source: &str,
    source_layer: &str,
    style: &StyleDescriptor,
) -> Vec<LayerDeclaration> {
    vec![
        LayerDeclaration::circle(source, source_layer, style),
        LayerDeclaration::line(source, source_layer, style),
        LayerDeclaration::fill(source, source_layer, style),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_only_filter() {
        let f = GeometryFilter::PointsOnly;
        assert!(f.accepts(GeometryType::Point));
        assert!(f.accepts(GeometryType::MultiPoint));
        for rejected in [
            GeometryType::LineString,
            GeometryType::MultiLineString,
            GeometryType::Polygon,
            GeometryType::MultiPolygon,
        ] {
            assert!(!f.accepts(rejected), "{rejected:?} must not be drawn as a circle");
        }
        assert_eq!(
            f.to_expression(),
            json!(["match", ["geometry-type"], ["Point", "MultiPoint"], true, false])
        );
    }

    #[test]
    fn layers_stack_circle_line_fill() {
        let layers = vector_layers("all", "all", &StyleDescriptor::default());
        let kinds: Vec<LayerKind> = layers.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LayerKind::Circle, LayerKind::Line, LayerKind::Fill]);
        let ids: Vec<&str> = layers.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["all-circle", "all-line", "all-fill"]);
        assert_eq!(layers[0].filter, Some(GeometryFilter::PointsOnly));
        assert!(layers[1].filter.is_none());
        assert!(layers[2].filter.is_none());
    }

    #[test]
    fn circle_layer_serializes_to_maplibre_style() {
        let circle = LayerDeclaration::circle("all", "all", &StyleDescriptor::default());
        let value = serde_json::to_value(&circle).unwrap();
        assert_eq!(value["type"], "circle");
        assert_eq!(value["source"], "all");
        assert_eq!(value["source-layer"], "all");
        assert_eq!(value["paint"]["circle-radius"], 6.0);
        assert_eq!(value["filter"][0], "match");
        assert!(value.get("layout").is_none());
    }

    #[test]
    fn line_layer_has_round_joins() {
        let line = LayerDeclaration::line("all", "all", &StyleDescriptor::default());
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["layout"]["line-join"], "round");
        assert_eq!(value["layout"]["line-cap"], "round");
        assert_eq!(value["paint"]["line-color"], "red");
    }

    #[test]
    fn unfilled_style_hides_fill() {
        let style = StyleDescriptor {
            fill: false,
            ..StyleDescriptor::default()
        };
        let fill = LayerDeclaration::fill("all", "all", &style);
        assert_eq!(fill.paint["fill-opacity"], 0.0);
    }

    #[test]
    fn background_has_no_source() {
        let bg = LayerDeclaration::background("background", "#f8f4f0");
        let value = serde_json::to_value(&bg).unwrap();
        assert_eq!(value["type"], "background");
        assert!(value.get("source").is_none());
        assert!(value.get("source-layer").is_none());
    }

    #[test]
    fn geometry_type_names_round_trip() {
        for g in GeometryType::ALL {
            assert_eq!(GeometryType::parse(g.as_str()), Some(g));
        }
        assert_eq!(GeometryType::parse("GeometryCollection"), None);
    }
}
