// Camera capability snapshot and facing mode
use serde::Deserialize;

use super::zoom::{MAX_SCALE, MIN_SCALE};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FacingMode {
    #[default]
    Environment,
    User,
}

impl FacingMode {
    pub fn toggled(self) -> Self {
        match self {
            FacingMode::Environment => FacingMode::User,
            FacingMode::User => FacingMode::Environment,
        }
    }

    /// Value of the `facingMode` media constraint.
    pub fn as_constraint(self) -> &'static str {
        match self {
            FacingMode::Environment => "environment",
            FacingMode::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "environment" | "back" | "rear" => Some(FacingMode::Environment),
            "user" | "front" => Some(FacingMode::User),
            _ => None,
        }
    }
}

/// Hardware zoom range reported by the video track.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct OpticalZoomRange {
    pub min: f64,
    pub max: f64,
}

impl OpticalZoomRange {
    /// Linearly maps a clamped scale's position within [1,5] onto the range.
    pub fn normalize(&self, scale: f64) -> f64 {
        let t = (scale - MIN_SCALE) / (MAX_SCALE - MIN_SCALE);
        self.min + (self.max - self.min) * t
    }
}

/// Read-only snapshot, valid for one camera session only.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraCapabilities {
    pub optical_zoom: Option<OpticalZoomRange>,
}

#[derive(Deserialize)]
struct TrackCapabilities {
    #[serde(default)]
    zoom: Option<OpticalZoomRange>,
}

impl CameraCapabilities {
    #[cfg(test)]
    pub fn with_optical_zoom(min: f64, max: f64) -> Self {
        Self {
            optical_zoom: Some(OpticalZoomRange { min, max }),
        }
    }

    /// Parses a JSON-serialized `MediaTrackCapabilities` object. Unknown
    /// members are ignored; a missing or degenerate zoom range means no
    /// optical zoom.
    pub fn from_track_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: TrackCapabilities = serde_json::from_str(json)?;
        let optical_zoom = raw
            .zoom
            .filter(|r| r.min.is_finite() && r.max.is_finite() && r.max > r.min);
        Ok(Self { optical_zoom })
    }

    pub fn supports_optical_zoom(&self) -> bool {
        self.optical_zoom.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_mode_toggles_both_ways() {
        assert_eq!(FacingMode::Environment.toggled(), FacingMode::User);
        assert_eq!(FacingMode::User.toggled(), FacingMode::Environment);
        assert_eq!(FacingMode::parse(" Front "), Some(FacingMode::User));
        assert_eq!(FacingMode::parse("sideways"), None);
    }

    #[test]
    fn normalize_maps_scale_linearly() {
        let range = OpticalZoomRange { min: 0.0, max: 10.0 };
        assert_eq!(range.normalize(1.0), 0.0);
        assert_eq!(range.normalize(3.0), 5.0);
        assert_eq!(range.normalize(5.0), 10.0);

        let range = OpticalZoomRange { min: 1.0, max: 3.0 };
        assert_eq!(range.normalize(2.0), 1.5);
    }

    #[test]
    fn parses_zoom_capability() {
        let caps = CameraCapabilities::from_track_json(
            r#"{"width":{"min":1,"max":4032},"zoom":{"min":1,"max":8,"step":0.1},"facingMode":["environment"]}"#,
        )
        .unwrap();
        assert_eq!(caps, CameraCapabilities::with_optical_zoom(1.0, 8.0));
    }

    #[test]
    fn missing_or_flat_zoom_means_digital_only() {
        let caps = CameraCapabilities::from_track_json(r#"{"width":{"min":1,"max":640}}"#).unwrap();
        assert!(!caps.supports_optical_zoom());

        let caps = CameraCapabilities::from_track_json(r#"{"zoom":{"min":1,"max":1}}"#).unwrap();
        assert!(!caps.supports_optical_zoom());

        assert!(CameraCapabilities::from_track_json("not json").is_err());
    }
}
