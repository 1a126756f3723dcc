// Formatting helpers for the overlay UI
use crate::state::ZoomState;

pub fn format_zoom_label(state: &ZoomState) -> String {
    let mode = if state.uses_optical_zoom { "optical" } else { "digital" };
    format!("Zoom: {:.0}% ({})", state.scale * 100.0, mode)
}

/// Inline CSS transform for the video element.
pub fn css_scale(scale: f64) -> String {
    format!("scale({scale:.3})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_label_rounds_percent() {
        let s = ZoomState { scale: 1.5, uses_optical_zoom: true };
        assert_eq!(format_zoom_label(&s), "Zoom: 150% (optical)");
        let s = ZoomState { scale: 1.2000000000000002, uses_optical_zoom: false };
        assert_eq!(format_zoom_label(&s), "Zoom: 120% (digital)");
    }

    #[test]
    fn css_scale_is_compact() {
        assert_eq!(css_scale(1.0), "scale(1.000)");
        assert_eq!(css_scale(2.25), "scale(2.250)");
    }
}
