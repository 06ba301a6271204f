pub mod bootstrap;
pub mod engine;
pub mod error;
pub mod loader;
pub mod plan;
pub mod script;

pub use bootstrap::start;
pub use engine::MapEngine;
pub use error::ViewerError;
pub use loader::{ConfigSource, HttpConfigSource};
pub use plan::ViewerPlan;

#[cfg(target_arch = "wasm32")]
mod web {
    use crate::engine::{JsEngine, MapHandle};
    use crate::{HttpConfigSource, start};
    use std::cell::RefCell;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    thread_local! {
        // The map lives as long as the page.
        static VIEWER: RefCell<Option<MapHandle>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let Some(window) = web_sys::window() else {
            return;
        };

        if document_complete(&window) {
            launch();
            return;
        }

        let on_load = Closure::once_into_js(launch);
        if let Err(e) = window.add_event_listener_with_callback("load", on_load.unchecked_ref()) {
            log::error!("failed to register load handler: {e:?}");
        }
    }

    fn document_complete(window: &web_sys::Window) -> bool {
        window
            .document()
            .and_then(|d| js_sys::Reflect::get(&d, &JsValue::from_str("readyState")).ok())
            .and_then(|v| v.as_string())
            .is_some_and(|state| state == "complete")
    }

    fn launch() {
        wasm_bindgen_futures::spawn_local(async {
            let mut engine = JsEngine;
            if let Ok(handle) = start(&HttpConfigSource::same_origin(), &mut engine).await {
                VIEWER.with(|v| *v.borrow_mut() = Some(handle));
            }
        });
    }
}
