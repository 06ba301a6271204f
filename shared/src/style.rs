use crate::Properties;
use crate::tiles::TILE_LAYER;
use serde::Serialize;
use std::collections::BTreeMap;

/// Leaflet path options applied to a feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDescriptor {
    pub weight: f64,
    pub color: String,
    pub opacity: f64,
    pub fill_color: String,
    pub fill: bool,
    pub radius: f64,
    pub fill_opacity: f64,
}

impl Default for StyleDescriptor {
    fn default() -> Self {
        Self {
            weight: 2.0,
            color: "red".to_string(),
            opacity: 0.5,
            fill_color: "yellow".to_string(),
            fill: true,
            radius: 6.0,
            fill_opacity: 0.7,
        }
    }
}

/// Styles a feature from its properties and the current zoom.
///
/// Every rule is constant: evaluation ignores both inputs and has no side
/// effects, so a rule can be handed to the renderer as a plain object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StyleRule {
    descriptor: StyleDescriptor,
}

impl StyleRule {
    pub fn constant(descriptor: StyleDescriptor) -> Self {
        Self { descriptor }
    }

    pub fn evaluate(&self, _properties: &Properties, _zoom: f64) -> StyleDescriptor {
        self.descriptor.clone()
    }

    pub fn descriptor(&self) -> &StyleDescriptor {
        &self.descriptor
    }
}

impl Default for StyleRule {
    fn default() -> Self {
        Self::constant(StyleDescriptor::default())
    }
}

/// Style rules keyed by source layer name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StyleRules(BTreeMap<String, StyleRule>);

impl StyleRules {
    pub fn get(&self, layer: &str) -> Option<&StyleRule> {
        self.0.get(layer)
    }

    pub fn insert(&mut self, layer: impl Into<String>, rule: StyleRule) {
        self.0.insert(layer.into(), rule);
    }

    pub fn layers(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Default for StyleRules {
    fn default() -> Self {
        let mut rules = BTreeMap::new();
        rules.insert(TILE_LAYER.to_string(), StyleRule::default());
        Self(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rule_ignores_properties_and_zoom() {
        let rule = StyleRule::default();
        let empty = Properties::new();
        let mut park = Properties::new();
        park.insert("name".into(), json!("Golden Gate Park"));
        park.insert("type".into(), json!("park"));

        let reference = rule.evaluate(&empty, 0.0);
        for zoom in [0.0, 3.5, 12.0, 22.0] {
            assert_eq!(rule.evaluate(&empty, zoom), reference);
            assert_eq!(rule.evaluate(&park, zoom), reference);
        }
    }

    #[test]
    fn default_descriptor_serializes_as_leaflet_options() {
        let value = serde_json::to_value(StyleDescriptor::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "weight": 2.0,
                "color": "red",
                "opacity": 0.5,
                "fillColor": "yellow",
                "fill": true,
                "radius": 6.0,
                "fillOpacity": 0.7,
            })
        );
    }

    #[test]
    fn default_rules_cover_the_all_layer() {
        let rules = StyleRules::default();
        assert_eq!(rules.layers().collect::<Vec<_>>(), vec!["all"]);
        let value = serde_json::to_value(&rules).unwrap();
        assert_eq!(value["all"]["fillColor"], "yellow");
    }
}
