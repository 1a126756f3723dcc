use std::rc::Rc;

mod components;
mod config;
mod error;
mod logging;
mod media;
mod model;
mod state;
mod util;

use components::app::{App, AppProps};
use config::ViewerConfig;

fn main() {
    let (config, warnings) = ViewerConfig::from_location();
    logging::init(config.log_level);
    for warning in warnings {
        log::warn!("ignoring config value: {warning}");
    }
    log::info!(
        "starting camera viewer ({} camera, zoom step {})",
        config.initial_facing.as_constraint(),
        config.zoom_step
    );
    yew::Renderer::<App>::with_props(AppProps {
        config: Rc::new(config),
    })
    .render();
}
