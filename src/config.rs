//! Runtime configuration, read once from the page URL query string.
//!
//! Recognised keys: `step`, `width`, `height`, `facing`, `log`. Nothing is
//! persisted.

use log::LevelFilter;

use crate::state::FacingMode;
use crate::state::zoom::{DEFAULT_ZOOM_STEP, MAX_SCALE, MIN_SCALE};

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    /// Scale delta of the zoom-in/zoom-out buttons.
    pub zoom_step: f64,
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub initial_facing: FacingMode,
    pub log_level: LevelFilter,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom_step: DEFAULT_ZOOM_STEP,
            ideal_width: 1920,
            ideal_height: 1080,
            initial_facing: FacingMode::Environment,
            log_level: LevelFilter::Info,
        }
    }
}

impl ViewerConfig {
    /// Parses `?key=value&...` (leading `?` optional). Bad values keep their
    /// default; the returned messages describe what was rejected.
    pub fn from_query(query: &str) -> (Self, Vec<String>) {
        let mut cfg = Self::default();
        let mut warnings = Vec::new();

        for pair in query.trim_start_matches('?').split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "step" => match value.parse::<f64>() {
                    Ok(v) if v > 0.0 && v <= MAX_SCALE - MIN_SCALE => cfg.zoom_step = v,
                    _ => warnings.push(format!("invalid zoom step {value:?}")),
                },
                "width" => match value.parse::<u32>() {
                    Ok(v) if v > 0 => cfg.ideal_width = v,
                    _ => warnings.push(format!("invalid width {value:?}")),
                },
                "height" => match value.parse::<u32>() {
                    Ok(v) if v > 0 => cfg.ideal_height = v,
                    _ => warnings.push(format!("invalid height {value:?}")),
                },
                "facing" => match FacingMode::parse(value) {
                    Some(f) => cfg.initial_facing = f,
                    None => warnings.push(format!("invalid facing mode {value:?}")),
                },
                "log" => match value.parse::<LevelFilter>() {
                    Ok(level) => cfg.log_level = level,
                    Err(_) => warnings.push(format!("invalid log level {value:?}")),
                },
                _ => {}
            }
        }
        (cfg, warnings)
    }

    /// Config for the current page, or defaults outside a browser.
    pub fn from_location() -> (Self, Vec<String>) {
        let query = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        Self::from_query(&query)
    }
}
