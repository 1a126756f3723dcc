//! Camera failure taxonomy.
//!
//! Every variant except `ConstraintApplicationFailure` ends up in the retry
//! prompt. Constraint failures are recovered by the zoom controller and only
//! ever reach the log.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("no camera device found")]
    DeviceNotFound,
    #[error("camera device is busy")]
    DeviceBusy,
    #[error("video playback failed: {0}")]
    PlaybackFailure(String),
    #[error("zoom constraint rejected: {0}")]
    ConstraintApplicationFailure(String),
    #[error("camera error: {0}")]
    Unknown(String),
}

impl CameraError {
    /// Maps a DOMException `name` from `getUserMedia` to the taxonomy.
    pub fn from_dom_name(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "SecurityError" => CameraError::PermissionDenied,
            "NotFoundError" | "OverconstrainedError" => CameraError::DeviceNotFound,
            "NotReadableError" | "AbortError" => CameraError::DeviceBusy,
            _ if message.is_empty() => CameraError::Unknown(name.to_string()),
            _ => CameraError::Unknown(format!("{name}: {message}")),
        }
    }

    pub fn is_user_facing(&self) -> bool {
        !matches!(self, CameraError::ConstraintApplicationFailure(_))
    }

    /// Headline shown in the retry prompt.
    pub fn user_message(&self) -> &'static str {
        match self {
            CameraError::PermissionDenied => {
                "Camera permission was denied. Allow camera access in your browser settings."
            }
            CameraError::DeviceNotFound => "No camera device was found.",
            CameraError::DeviceBusy => {
                "The camera could not be accessed. It may be in use by another application."
            }
            CameraError::PlaybackFailure(_) => {
                "The camera feed could not be played. Please try again."
            }
            CameraError::ConstraintApplicationFailure(_) | CameraError::Unknown(_) => {
                "Something went wrong while accessing the camera. Please try again."
            }
        }
    }
}
