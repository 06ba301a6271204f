use crate::engine::MapEngine;
use crate::error::ViewerError;
use crate::loader::ConfigSource;
use crate::plan::ViewerPlan;
use log::{debug, error, warn};
use mvtshow_shared::Renderer;

/// Fetches the config, picks a renderer and brings the map up.
///
/// Both failure kinds are logged here and end the viewer: a config that
/// cannot be retrieved means the engine is never touched, and an engine that
/// fails part way keeps whatever it already built.
pub async fn start<S, E>(source: &S, engine: &mut E) -> Result<E::Handle, ViewerError>
where
    S: ConfigSource,
    E: MapEngine,
{
    let config = source
        .fetch_config()
        .await
        .inspect_err(|e| error!("failed to retrieve map config: {e}"))?;

    if let Some(name) = &config.unrecognized_renderer {
        warn!(
            "unrecognized renderer {name:?}, falling back to {}",
            Renderer::default()
        );
    }

    if config.renderer == Renderer::Leaflet && config.popups_enabled() {
        warn!("label popups are not rendered by the leaflet renderer");
    }

    let plan = ViewerPlan::for_config(&config);
    debug!("opening {} map", plan.renderer());

    engine
        .open(&plan)
        .inspect_err(|e| error!("failed to initialize map: {e}"))
}
