pub mod app;
pub mod camera_controls;
pub mod camera_view;
pub mod permission_overlay;
pub mod zoom_indicator;
