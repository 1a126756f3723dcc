pub mod camera;
pub mod touch;
pub mod zoom;

pub use camera::{CameraCapabilities, FacingMode};
pub use touch::{PinchTracker, TouchPoint};
pub use zoom::{
    RenderInstruction, SessionGeneration, ZoomAction, ZoomController, ZoomState, ZoomUpdate,
};
