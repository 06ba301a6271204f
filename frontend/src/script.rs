// frontend/src/script.rs
//
// Renders plans into JS for the mapping libraries. Each script evaluates to a
// factory `function (popupHtml) { ...; return map; }` so the caller keeps the
// map object instead of a window global. `popupHtml` receives the clicked
// feature's properties and returns the popup body or null.

use crate::error::ViewerError;
use crate::plan::{CanvasPlan, PopupBinding, VectorPlan};
use serde::Serialize;

fn js<T: Serialize + ?Sized>(value: &T) -> Result<String, ViewerError> {
    serde_json::to_string(value).map_err(|e| ViewerError::Script(e.to_string()))
}

pub fn canvas_script(plan: &CanvasPlan) -> Result<String, ViewerError> {
    let script = r#"
    (function () {
      return function (popupHtml) {
        var map = L.map(__CONTAINER__);
        map.fitBounds(__BOUNDS__);

        var layer = L.vectorGrid.protobuf(__TILE_URL__, {
          rendererFactory: L.canvas.tile,
          vectorTileLayerStyles: __STYLES__,
          interactive: __INTERACTIVE__
        });
        __CLICK__
        layer.addTo(map);
        return map;
      };
    })()
    "#;

    let click = if plan.log_clicks {
        r#"layer.on("click", function (e) {
          console.log("clicked feature", e.layer && e.layer.properties);
        });"#
    } else {
        ""
    };

    Ok(script
        .replace("__CONTAINER__", &js(&plan.container)?)
        .replace("__BOUNDS__", &js(&plan.bounds)?)
        .replace("__TILE_URL__", &js(&plan.tile_url)?)
        .replace("__STYLES__", &js(&plan.styles)?)
        .replace("__INTERACTIVE__", if plan.log_clicks { "true" } else { "false" })
        .replace("__CLICK__", click))
}

pub fn vector_script(plan: &VectorPlan) -> Result<String, ViewerError> {
    let script = r#"
    (function () {
      return function (popupHtml) {
        function absolute(url) {
          return url.charAt(0) === "/" ? window.location.origin + url : url;
        }

        var map = new maplibregl.Map({
          container: __CONTAINER__,
          style: { version: 8, sources: {}, layers: [__BACKGROUND__] },
          bounds: __BOUNDS__
        });

        map.on("load", function () {
          try {
            var source = __SOURCE__;
            source.tiles = source.tiles.map(absolute);
            map.addSource(__SOURCE_ID__, source);

            __LAYERS__.forEach(function (layer) {
              map.addLayer(layer);
            });
            __POPUP__
            __HOVER__
          } catch (e) {
            console.error("failed to set up map layers", e);
          }
        });

        return map;
      };
    })()
    "#;

    let popup = match &plan.popup {
        Some(binding) => popup_block(binding)?,
        None => String::new(),
    };

    let hover = if plan.hover_layers.is_empty() {
        String::new()
    } else {
        r#"__HOVER_LAYERS__.forEach(function (id) {
              map.on("mouseenter", id, function () {
                map.getCanvas().style.cursor = "pointer";
              });
              map.on("mouseleave", id, function () {
                map.getCanvas().style.cursor = "";
              });
            });"#
            .replace("__HOVER_LAYERS__", &js(&plan.hover_layers)?)
    };

    Ok(script
        .replace("__CONTAINER__", &js(&plan.container)?)
        .replace("__BACKGROUND__", &js(&plan.background)?)
        .replace("__BOUNDS__", &js(&plan.bounds)?)
        .replace("__SOURCE__", &js(&plan.source.to_style_source())?)
        .replace("__SOURCE_ID__", &js(&plan.source.id)?)
        .replace("__LAYERS__", &js(&plan.layers)?)
        .replace("__POPUP__", &popup)
        .replace("__HOVER__", &hover))
}

fn popup_block(binding: &PopupBinding) -> Result<String, ViewerError> {
    let block = r#"__POPUP_LAYERS__.forEach(function (id) {
              map.on("click", id, function (e) {
                var feature = e.features && e.features[0];
                if (!feature || typeof popupHtml !== "function") {
                  return;
                }
                var html = popupHtml(feature.properties);
                if (!html) {
                  return;
                }
                new maplibregl.Popup().setLngLat(e.lngLat).setHTML(html).addTo(map);
              });
            });"#;

    Ok(block.replace("__POPUP_LAYERS__", &js(&binding.layers)?))
}
