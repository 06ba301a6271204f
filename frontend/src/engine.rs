use crate::error::ViewerError;
use crate::plan::{CanvasPlan, VectorPlan, ViewerPlan};

/// A mapping library able to realize a plan.
pub trait MapEngine {
    /// Owned handle to the live map.
    type Handle;

    fn open_canvas(&mut self, plan: &CanvasPlan) -> Result<Self::Handle, ViewerError>;

    fn open_vector(&mut self, plan: &VectorPlan) -> Result<Self::Handle, ViewerError>;

    fn open(&mut self, plan: &ViewerPlan) -> Result<Self::Handle, ViewerError> {
        match plan {
            ViewerPlan::Canvas(p) => self.open_canvas(p),
            ViewerPlan::Vector(p) => self.open_vector(p),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use js::{JsEngine, MapHandle};

/* ================================================================================================
 * JS bridge: evaluates rendered scripts against the globally loaded Leaflet / MapLibre
 * ============================================================================================== */

#[cfg(target_arch = "wasm32")]
mod js {
    use super::MapEngine;
    use crate::error::ViewerError;
    use crate::plan::{CanvasPlan, VectorPlan};
    use crate::script::{canvas_script, vector_script};
    use mvtshow_shared::{Properties, popup_html};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    type PopupCallback = Closure<dyn Fn(JsValue) -> JsValue>;

    /// Live map plus the callbacks it calls back into.
    pub struct MapHandle {
        map: JsValue,
        _popup: Option<PopupCallback>,
    }

    impl MapHandle {
        pub fn map(&self) -> &JsValue {
            &self.map
        }
    }

    #[derive(Debug, Default)]
    pub struct JsEngine;

    impl MapEngine for JsEngine {
        type Handle = MapHandle;

        fn open_canvas(&mut self, plan: &CanvasPlan) -> Result<MapHandle, ViewerError> {
            ensure_container(&plan.container)?;
            let map = run_factory(&canvas_script(plan)?, &JsValue::UNDEFINED)?;
            Ok(MapHandle { map, _popup: None })
        }

        fn open_vector(&mut self, plan: &VectorPlan) -> Result<MapHandle, ViewerError> {
            ensure_container(&plan.container)?;
            let popup = plan
                .popup
                .as_ref()
                .map(|binding| popup_callback(binding.label_properties.clone()));
            let arg = popup
                .as_ref()
                .map(|cb| cb.as_ref().clone())
                .unwrap_or(JsValue::UNDEFINED);

            let map = run_factory(&vector_script(plan)?, &arg)?;
            Ok(MapHandle { map, _popup: popup })
        }
    }

    fn ensure_container(id: &str) -> Result<(), ViewerError> {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
            .map(|_| ())
            .ok_or_else(|| ViewerError::MissingContainer(id.to_string()))
    }

    fn run_factory(script: &str, arg: &JsValue) -> Result<JsValue, ViewerError> {
        let factory: js_sys::Function = js_sys::eval(script)
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| ViewerError::Script("map script did not yield a function".into()))?;
        factory.call1(&JsValue::NULL, arg).map_err(js_error)
    }

    fn popup_callback(label_properties: Vec<String>) -> PopupCallback {
        Closure::wrap(Box::new(move |props: JsValue| {
            let raw = js_sys::JSON::stringify(&props)
                .ok()
                .and_then(|s| s.as_string())
                .unwrap_or_default();
            let properties: Properties = serde_json::from_str(&raw).unwrap_or_default();
            match popup_html(&properties, &label_properties) {
                Some(html) => JsValue::from_str(&html),
                None => JsValue::NULL,
            }
        }) as Box<dyn Fn(JsValue) -> JsValue>)
    }

    fn js_error(e: JsValue) -> ViewerError {
        let msg = e
            .dyn_ref::<js_sys::Error>()
            .map(|err| String::from(err.message()))
            .or_else(|| e.as_string())
            .unwrap_or_else(|| format!("{e:?}"));
        ViewerError::Script(msg)
    }
}
