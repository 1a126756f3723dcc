// Touch/pinch gesture state

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &TouchPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Distance between the two fingers of a pinch sample. Anything other than
/// exactly two points is not a pinch.
pub fn pinch_distance(points: &[TouchPoint]) -> Option<f64> {
    match points {
        [a, b] => Some(a.distance_to(b)),
        _ => None,
    }
}

/// `initial_scale * (current_distance / initial_distance)`, or `None` when the
/// initial distance is zero.
pub fn map_pinch_to_scale(initial_distance: f64, current_distance: f64, initial_scale: f64) -> Option<f64> {
    if initial_distance == 0.0 || !initial_distance.is_finite() {
        return None;
    }
    Some(initial_scale * (current_distance / initial_distance))
}

#[derive(Default, Debug, Clone)]
pub struct PinchTracker {
    pinch: Option<PinchStart>,
}

#[derive(Debug, Clone, Copy)]
struct PinchStart {
    distance: f64,
    scale: f64,
}

impl PinchTracker {
    #[cfg(test)]
    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    /// touchstart: a two-point sample (re)anchors the pinch at the current scale.
    pub fn begin(&mut self, points: &[TouchPoint], current_scale: f64) {
        if let Some(distance) = pinch_distance(points) {
            self.pinch = Some(PinchStart {
                distance,
                scale: current_scale,
            });
        }
    }

    /// touchmove: the requested scale for a two-point sample, if pinching.
    pub fn update(&mut self, points: &[TouchPoint], current_scale: f64) -> Option<f64> {
        let current = pinch_distance(points)?;
        let start = match self.pinch {
            Some(start) => start,
            None => {
                // second finger landed without a touchstart we saw
                self.begin(points, current_scale);
                return None;
            }
        };
        map_pinch_to_scale(start.distance, current, start.scale)
    }

    /// touchend/touchcancel with the remaining point count.
    pub fn end(&mut self, remaining: usize) {
        if remaining < 2 {
            self.pinch = None;
        }
    }
}
