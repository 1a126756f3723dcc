//! Camera session lifecycle as seen by the UI.
//!
//! Every action carries the generation it was issued for; actions from a
//! superseded acquisition are ignored by the reducer.

use std::rc::Rc;
use yew::Reducible;

use crate::error::CameraError;
use crate::state::{FacingMode, SessionGeneration};

#[derive(Clone, Debug, PartialEq)]
pub enum SessionPhase {
    /// Waiting on the permission prompt / device.
    Requesting,
    Live,
    Failed(CameraError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub facing: FacingMode,
    pub generation: SessionGeneration,
    pub phase: SessionPhase,
}

impl SessionState {
    pub fn new(facing: FacingMode) -> Self {
        Self {
            facing,
            generation: SessionGeneration::default(),
            phase: SessionPhase::Requesting,
        }
    }

    pub fn is_live(&self) -> bool {
        self.phase == SessionPhase::Live
    }

    pub fn is_requesting(&self) -> bool {
        self.phase == SessionPhase::Requesting
    }

    pub fn error(&self) -> Option<&CameraError> {
        match &self.phase {
            SessionPhase::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub enum SessionAction {
    Begin {
        generation: SessionGeneration,
        facing: FacingMode,
    },
    Live {
        generation: SessionGeneration,
    },
    Failed {
        generation: SessionGeneration,
        error: CameraError,
    },
}

impl Reducible for SessionState {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use SessionAction::*;
        let mut new = (*self).clone();
        match action {
            Begin { generation, facing } => {
                if generation < new.generation {
                    return self;
                }
                new.generation = generation;
                new.facing = facing;
                new.phase = SessionPhase::Requesting;
            }
            Live { generation } => {
                if generation != new.generation {
                    return self;
                }
                new.phase = SessionPhase::Live;
            }
            Failed { generation, error } => {
                if generation != new.generation || !error.is_user_facing() {
                    return self;
                }
                new.phase = SessionPhase::Failed(error);
            }
        }
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generation(n: usize) -> SessionGeneration {
        (0..n).fold(SessionGeneration::default(), |g, _| g.next())
    }

    fn reduce(state: SessionState, action: SessionAction) -> SessionState {
        (*Rc::new(state).reduce(action)).clone()
    }

    #[test]
    fn happy_path_goes_live() {
        let s = SessionState::new(FacingMode::Environment);
        let s = reduce(s, SessionAction::Begin { generation: generation(1), facing: FacingMode::Environment });
        assert!(s.is_requesting());
        let s = reduce(s, SessionAction::Live { generation: generation(1) });
        assert!(s.is_live());
    }

    #[test]
    fn failures_surface_for_retry() {
        let s = reduce(
            SessionState::new(FacingMode::User),
            SessionAction::Begin { generation: generation(1), facing: FacingMode::User },
        );
        let s = reduce(s, SessionAction::Failed { generation: generation(1), error: CameraError::PermissionDenied });
        assert_eq!(s.error(), Some(&CameraError::PermissionDenied));
        assert!(!s.is_live());

        // retry starts a fresh request
        let s = reduce(s, SessionAction::Begin { generation: generation(2), facing: FacingMode::User });
        assert!(s.is_requesting());
        assert!(s.error().is_none());
    }

    #[test]
    fn stale_results_are_ignored() {
        let s = reduce(
            SessionState::new(FacingMode::Environment),
            SessionAction::Begin { generation: generation(2), facing: FacingMode::User },
        );
        let s = reduce(s, SessionAction::Live { generation: generation(1) });
        assert!(s.is_requesting());
        let s = reduce(s, SessionAction::Failed { generation: generation(1), error: CameraError::DeviceBusy });
        assert!(s.is_requesting());
        let s = reduce(s, SessionAction::Begin { generation: generation(1), facing: FacingMode::Environment });
        assert_eq!(s.facing, FacingMode::User);
        assert_eq!(s.generation, generation(2));
    }

    #[test]
    fn constraint_failures_never_reach_the_prompt() {
        let s = reduce(
            SessionState::new(FacingMode::Environment),
            SessionAction::Begin { generation: generation(1), facing: FacingMode::Environment },
        );
        let s = reduce(s, SessionAction::Live { generation: generation(1) });
        let s = reduce(
            s,
            SessionAction::Failed {
                generation: generation(1),
                error: CameraError::ConstraintApplicationFailure("rejected".into()),
            },
        );
        assert!(s.is_live());
    }
}
