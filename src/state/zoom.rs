//! Zoom controller: turns a requested linear zoom level into either a
//! hardware zoom constraint or a visual scale for the video element.
//!
//! Hardware constraints are applied asynchronously by the caller. Each
//! constraint request carries a [`ZoomTicket`] tagging the session generation
//! and request sequence it was issued under, and results are handed back
//! through [`ZoomController::settle_constraint`], which drops anything issued
//! under a superseded session or overtaken by a newer request.

use log::{debug, warn};

use super::camera::CameraCapabilities;
use crate::error::CameraError;

pub const MIN_SCALE: f64 = 1.0;
pub const MAX_SCALE: f64 = 5.0;
pub const DEFAULT_ZOOM_STEP: f64 = 0.2;

/// Linear zoom factor, always within [`MIN_SCALE`, `MAX_SCALE`].
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct ZoomScale(f64);

impl ZoomScale {
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(MIN_SCALE);
        }
        Self(value.clamp(MIN_SCALE, MAX_SCALE))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= MIN_SCALE
    }

    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= MAX_SCALE
    }
}

impl Default for ZoomScale {
    fn default() -> Self {
        Self(MIN_SCALE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomState {
    pub scale: f64,
    /// True while the current scale is (or is being) applied by the camera
    /// hardware rather than by scaling the rendered frame.
    pub uses_optical_zoom: bool,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            scale: MIN_SCALE,
            uses_optical_zoom: false,
        }
    }
}

/// Monotonic id of a camera acquisition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionGeneration(u64);

impl SessionGeneration {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoomTicket {
    pub generation: SessionGeneration,
    pub sequence: u64,
}

/// A hardware zoom value the caller should apply to the active track.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstraintRequest {
    pub ticket: ZoomTicket,
    pub normalized: f64,
    pub scale: f64,
}

/// What the rendering surface should do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderInstruction {
    VisualScale(f64),
    /// Hardware zoom applied, render the frame unscaled.
    HardwareZoom,
}

impl RenderInstruction {
    pub fn css_scale(self) -> f64 {
        match self {
            RenderInstruction::VisualScale(s) => s,
            RenderInstruction::HardwareZoom => 1.0,
        }
    }
}

impl Default for RenderInstruction {
    fn default() -> Self {
        RenderInstruction::VisualScale(MIN_SCALE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomAction {
    Render(RenderInstruction),
    ApplyConstraint(ConstraintRequest),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomUpdate {
    pub state: ZoomState,
    pub action: ZoomAction,
}

#[derive(Debug, Clone)]
pub struct ZoomController {
    state: ZoomState,
    capabilities: Option<CameraCapabilities>,
    generation: SessionGeneration,
    sequence: u64,
    step: f64,
}

impl Default for ZoomController {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM_STEP)
    }
}

impl ZoomController {
    pub fn new(step: f64) -> Self {
        Self {
            state: ZoomState::default(),
            capabilities: None,
            generation: SessionGeneration::default(),
            sequence: 0,
            step,
        }
    }

    pub fn state(&self) -> ZoomState {
        self.state
    }

    #[cfg(test)]
    pub fn generation(&self) -> SessionGeneration {
        self.generation
    }

    #[cfg(test)]
    pub fn capabilities(&self) -> Option<CameraCapabilities> {
        self.capabilities
    }

    pub fn is_current(&self, generation: SessionGeneration) -> bool {
        self.generation == generation
    }

    /// Starts a new camera session: bumps the generation, resets the zoom and
    /// forgets the previous session's capabilities.
    pub fn begin_session(&mut self) -> SessionGeneration {
        self.generation = self.generation.next();
        self.state = ZoomState::default();
        self.capabilities = None;
        debug!("zoom session {} started", self.generation.get());
        self.generation
    }

    /// Returns false (and changes nothing) when `generation` is stale. A
    /// camera with an optical range starts the session in optical mode.
    pub fn attach_capabilities(
        &mut self,
        generation: SessionGeneration,
        capabilities: CameraCapabilities,
    ) -> bool {
        if !self.is_current(generation) {
            debug!(
                "ignoring capabilities for stale session {} (current {})",
                generation.get(),
                self.generation.get()
            );
            return false;
        }
        self.capabilities = Some(capabilities);
        self.state.uses_optical_zoom = capabilities.supports_optical_zoom();
        true
    }

    pub fn request_zoom(&mut self, requested: f64) -> ZoomUpdate {
        let scale = if requested.is_nan() {
            self.state.scale
        } else {
            ZoomScale::new(requested).value()
        };

        let optical = self.capabilities.and_then(|c| c.optical_zoom);
        let action = match optical {
            Some(range) => {
                self.sequence += 1;
                let request = ConstraintRequest {
                    ticket: ZoomTicket {
                        generation: self.generation,
                        sequence: self.sequence,
                    },
                    normalized: range.normalize(scale),
                    scale,
                };
                self.state = ZoomState {
                    scale,
                    uses_optical_zoom: true,
                };
                ZoomAction::ApplyConstraint(request)
            }
            None => {
                self.state = ZoomState {
                    scale,
                    uses_optical_zoom: false,
                };
                ZoomAction::Render(RenderInstruction::VisualScale(scale))
            }
        };

        ZoomUpdate {
            state: self.state,
            action,
        }
    }

    pub fn zoom_in(&mut self) -> ZoomUpdate {
        self.request_zoom(self.state.scale + self.step)
    }

    pub fn zoom_out(&mut self) -> ZoomUpdate {
        self.request_zoom(self.state.scale - self.step)
    }

    pub fn can_zoom_in(&self) -> bool {
        !ZoomScale::new(self.state.scale).is_max()
    }

    pub fn can_zoom_out(&self) -> bool {
        !ZoomScale::new(self.state.scale).is_min()
    }

    /// Feeds back the outcome of a hardware constraint. Returns `None` when
    /// the result belongs to an older session or an overtaken request.
    /// Failures fall back to visual scaling for this request only.
    pub fn settle_constraint(
        &mut self,
        ticket: ZoomTicket,
        result: Result<(), CameraError>,
    ) -> Option<ZoomUpdate> {
        if !self.is_current(ticket.generation) {
            debug!(
                "discarding zoom result from stale session {} (current {})",
                ticket.generation.get(),
                self.generation.get()
            );
            return None;
        }
        if ticket.sequence != self.sequence {
            debug!(
                "discarding overtaken zoom result #{} (latest #{})",
                ticket.sequence, self.sequence
            );
            return None;
        }

        let instruction = match result {
            Ok(()) => {
                self.state.uses_optical_zoom = true;
                RenderInstruction::HardwareZoom
            }
            Err(err) => {
                warn!("optical zoom failed, falling back to digital zoom: {err}");
                self.state.uses_optical_zoom = false;
                RenderInstruction::VisualScale(self.state.scale)
            }
        };
        Some(ZoomUpdate {
            state: self.state,
            action: ZoomAction::Render(instruction),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optical(min: f64, max: f64) -> ZoomController {
        let mut c = ZoomController::default();
        let generation = c.begin_session();
        assert!(c.attach_capabilities(generation, CameraCapabilities::with_optical_zoom(min, max)));
        c
    }

    fn digital() -> ZoomController {
        let mut c = ZoomController::default();
        let generation = c.begin_session();
        c.attach_capabilities(generation, CameraCapabilities::default());
        c
    }

    fn constraint(update: ZoomUpdate) -> ConstraintRequest {
        match update.action {
            ZoomAction::ApplyConstraint(req) => req,
            other => panic!("expected a constraint request, got {other:?}"),
        }
    }

    #[test]
    fn scale_always_within_bounds() {
        let mut c = digital();
        for r in [-100.0, -1.0, 0.0, 0.5, 1.0, 2.7, 5.0, 5.01, 10.0, 1e9, f64::INFINITY, f64::NEG_INFINITY] {
            let s = c.request_zoom(r).state.scale;
            assert!((MIN_SCALE..=MAX_SCALE).contains(&s), "{r} gave {s}");
        }
    }

    #[test]
    fn clamps_at_both_ends() {
        let mut c = digital();
        assert_eq!(c.request_zoom(0.5).state.scale, 1.0);
        assert_eq!(c.request_zoom(10.0).state.scale, 5.0);
    }

    #[test]
    fn nan_keeps_current_scale() {
        let mut c = digital();
        c.request_zoom(2.5);
        assert_eq!(c.request_zoom(f64::NAN).state.scale, 2.5);
        assert_eq!(ZoomScale::new(f64::NAN).value(), MIN_SCALE);
    }

    #[test]
    fn digital_zoom_renders_visual_scale() {
        let mut c = digital();
        let update = c.request_zoom(3.0);
        assert_eq!(update.action, ZoomAction::Render(RenderInstruction::VisualScale(3.0)));
        assert!(!update.state.uses_optical_zoom);
        assert_eq!(update.state.scale, 3.0);
    }

    #[test]
    fn zoom_before_capabilities_is_visual() {
        let mut c = ZoomController::default();
        c.begin_session();
        let update = c.request_zoom(2.0);
        assert_eq!(update.action, ZoomAction::Render(RenderInstruction::VisualScale(2.0)));
    }

    #[test]
    fn optical_zoom_maps_into_hardware_range() {
        let mut c = optical(0.0, 10.0);
        let update = c.request_zoom(3.0);
        let req = constraint(update);
        assert_eq!(req.normalized, 5.0);
        assert_eq!(req.scale, 3.0);
        assert!(update.state.uses_optical_zoom);

        let req = constraint(c.request_zoom(1.0));
        assert_eq!(req.normalized, 0.0);
        let req = constraint(c.request_zoom(5.0));
        assert_eq!(req.normalized, 10.0);
    }

    #[test]
    fn successful_constraint_renders_unscaled() {
        let mut c = optical(1.0, 8.0);
        let req = constraint(c.request_zoom(2.0));
        let settled = c.settle_constraint(req.ticket, Ok(())).unwrap();
        assert_eq!(settled.action, ZoomAction::Render(RenderInstruction::HardwareZoom));
        assert!(settled.state.uses_optical_zoom);
        assert_eq!(RenderInstruction::HardwareZoom.css_scale(), 1.0);
    }

    #[test]
    fn constraint_failure_falls_back_for_that_call_only() {
        let mut c = optical(0.0, 10.0);
        let req = constraint(c.request_zoom(3.0));
        let settled = c
            .settle_constraint(req.ticket, Err(CameraError::ConstraintApplicationFailure("rejected".into())))
            .unwrap();
        assert_eq!(settled.state.scale, 3.0);
        assert!(!settled.state.uses_optical_zoom);
        assert_eq!(settled.action, ZoomAction::Render(RenderInstruction::VisualScale(3.0)));

        // optical mode is still attempted on the next request
        let next = c.request_zoom(4.0);
        assert!(matches!(next.action, ZoomAction::ApplyConstraint(_)));
        assert!(c.capabilities().unwrap().supports_optical_zoom());
    }

    #[test]
    fn stale_generation_results_are_discarded() {
        let mut c = optical(0.0, 10.0);
        let req = constraint(c.request_zoom(4.0));
        let next = c.begin_session();
        assert!(next > req.ticket.generation);
        let before = c.state();

        assert!(c.settle_constraint(req.ticket, Ok(())).is_none());
        assert!(c
            .settle_constraint(req.ticket, Err(CameraError::ConstraintApplicationFailure("late".into())))
            .is_none());
        assert_eq!(c.state(), before);
        assert_eq!(c.state().scale, 1.0);
    }

    #[test]
    fn optical_camera_starts_in_optical_mode() {
        let c = optical(1.0, 8.0);
        assert_eq!(c.state().scale, 1.0);
        assert!(c.state().uses_optical_zoom);
        assert_eq!(c.generation().get(), 1);
        assert_eq!(crate::util::format_zoom_label(&c.state()), "Zoom: 100% (optical)");

        let c = digital();
        assert_eq!(crate::util::format_zoom_label(&c.state()), "Zoom: 100% (digital)");
    }

    #[test]
    fn only_the_latest_session_is_current() {
        let mut c = ZoomController::default();
        let first = c.begin_session();
        assert!(c.is_current(first));
        let second = c.begin_session();
        assert!(!c.is_current(first));
        assert!(c.is_current(second));
    }

    #[test]
    fn stale_capabilities_are_ignored() {
        let mut c = ZoomController::default();
        let first = c.begin_session();
        c.begin_session();
        assert!(!c.attach_capabilities(first, CameraCapabilities::with_optical_zoom(1.0, 4.0)));
        assert!(c.capabilities().is_none());
        assert!(!c.state().uses_optical_zoom);
    }

    #[test]
    fn overtaken_results_are_discarded() {
        let mut c = optical(0.0, 10.0);
        let first = constraint(c.request_zoom(2.0));
        let second = constraint(c.request_zoom(4.0));

        assert!(c
            .settle_constraint(first.ticket, Err(CameraError::ConstraintApplicationFailure("slow".into())))
            .is_none());
        assert_eq!(c.state().scale, 4.0);
        assert!(c.state().uses_optical_zoom);

        let settled = c.settle_constraint(second.ticket, Ok(())).unwrap();
        assert_eq!(settled.state.scale, 4.0);
    }

    #[test]
    fn session_restart_resets_zoom() {
        let mut c = digital();
        c.request_zoom(3.5);
        c.begin_session();
        assert_eq!(c.state(), ZoomState::default());
        assert!(c.capabilities().is_none());
    }

    #[test]
    fn step_buttons_respect_bounds() {
        let mut c = digital();
        assert!(!c.can_zoom_out());
        assert!(c.can_zoom_in());
        let s = c.zoom_in().state.scale;
        assert!((s - 1.2).abs() < 1e-9);
        for _ in 0..30 {
            c.zoom_in();
        }
        assert_eq!(c.state().scale, MAX_SCALE);
        assert!(!c.can_zoom_in());
        c.zoom_out();
        assert!(c.can_zoom_in());
        assert!(c.can_zoom_out());
    }
}
