//! Camera session over the browser media APIs.
//!
//! This is the only module that touches `getUserMedia` and media tracks;
//! every `JsValue` error is converted to a [`CameraError`] here.

use js_sys::{Function, JSON, Promise, Reflect};
use log::{debug, info, warn};
use serde_json::json;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlVideoElement, MediaStream, MediaStreamConstraints, MediaStreamTrack};

use crate::config::ViewerConfig;
use crate::error::CameraError;
use crate::state::{CameraCapabilities, FacingMode};

/// A live camera stream. Cloning shares the underlying stream.
#[derive(Clone, Debug)]
pub struct MediaCamera {
    stream: MediaStream,
}

impl MediaCamera {
    pub async fn acquire(facing: FacingMode, config: &ViewerConfig) -> Result<Self, CameraError> {
        let window = web_sys::window().ok_or_else(|| CameraError::Unknown("no window".into()))?;
        let devices = window.navigator().media_devices().map_err(|e| dom_error(&e))?;

        let constraints: MediaStreamConstraints = json_to_js(&json!({
            "audio": false,
            "video": {
                "facingMode": facing.as_constraint(),
                "width": { "ideal": config.ideal_width },
                "height": { "ideal": config.ideal_height },
            },
        }))
        .map_err(CameraError::Unknown)?
        .unchecked_into();

        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| dom_error(&e))?;
        let stream = JsFuture::from(promise).await.map_err(|e| dom_error(&e))?;
        let stream: MediaStream = stream
            .dyn_into()
            .map_err(|_| CameraError::Unknown("getUserMedia did not return a MediaStream".into()))?;

        info!("acquired {} camera stream {}", facing.as_constraint(), stream.id());
        Ok(Self { stream })
    }

    /// Stops every track of the stream.
    pub fn release(&self) {
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
        debug!("released camera stream {}", self.stream.id());
    }

    fn video_track(&self) -> Option<MediaStreamTrack> {
        self.stream.get_video_tracks().get(0).dyn_into().ok()
    }

    /// Queries the video track once. Any failure degrades to "no optical zoom".
    pub fn capabilities(&self) -> CameraCapabilities {
        match self.query_capabilities() {
            Ok(caps) => caps,
            Err(err) => {
                warn!("capability query failed, using digital zoom: {err}");
                CameraCapabilities::default()
            }
        }
    }

    fn query_capabilities(&self) -> Result<CameraCapabilities, CameraError> {
        let track = self
            .video_track()
            .ok_or_else(|| CameraError::Unknown("stream has no video track".into()))?;
        let get = Reflect::get(&track, &JsValue::from_str("getCapabilities"))
            .map_err(|e| CameraError::Unknown(describe(&e)))?;
        // Not every engine implements getCapabilities.
        let Some(get) = get.dyn_ref::<Function>() else {
            return Ok(CameraCapabilities::default());
        };
        let caps = get.call0(&track).map_err(|e| CameraError::Unknown(describe(&e)))?;
        let json: String = JSON::stringify(&caps)
            .map_err(|e| CameraError::Unknown(describe(&e)))?
            .into();
        CameraCapabilities::from_track_json(&json).map_err(|e| CameraError::Unknown(e.to_string()))
    }

    /// Applies `{ advanced: [{ zoom }] }` to the video track.
    pub async fn apply_zoom(&self, normalized: f64) -> Result<(), CameraError> {
        let track = self
            .video_track()
            .ok_or_else(|| CameraError::ConstraintApplicationFailure("stream has no video track".into()))?;
        let constraints = json_to_js(&json!({ "advanced": [{ "zoom": normalized }] }))
            .map_err(CameraError::ConstraintApplicationFailure)?;

        let apply = Reflect::get(&track, &JsValue::from_str("applyConstraints"))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| CameraError::ConstraintApplicationFailure("applyConstraints unavailable".into()))?;
        let promise: Promise = apply
            .call1(&track, &constraints)
            .map_err(|e| CameraError::ConstraintApplicationFailure(describe(&e)))?
            .dyn_into()
            .map_err(|_| CameraError::ConstraintApplicationFailure("applyConstraints returned no promise".into()))?;

        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|e| CameraError::ConstraintApplicationFailure(describe(&e)))
    }

    /// Binds the stream to `video` and starts playback.
    pub async fn attach_to(&self, video: &HtmlVideoElement) -> Result<(), CameraError> {
        video.set_muted(true);
        video.set_src_object(Some(&self.stream));
        let promise = video
            .play()
            .map_err(|e| CameraError::PlaybackFailure(describe(&e)))?;
        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|e| CameraError::PlaybackFailure(describe(&e)))
    }
}

fn json_to_js(value: &serde_json::Value) -> Result<JsValue, String> {
    JSON::parse(&value.to_string()).map_err(|e| describe(&e))
}

fn error_field(err: &JsValue, field: &str) -> Option<String> {
    Reflect::get(err, &JsValue::from_str(field))
        .ok()
        .and_then(|v| v.as_string())
}

fn dom_error(err: &JsValue) -> CameraError {
    let name = error_field(err, "name").unwrap_or_default();
    let message = error_field(err, "message").unwrap_or_default();
    CameraError::from_dom_name(&name, &message)
}

fn describe(err: &JsValue) -> String {
    match (error_field(err, "name"), error_field(err, "message")) {
        (Some(name), Some(message)) if !message.is_empty() => format!("{name}: {message}"),
        (Some(name), _) => name,
        _ => err.as_string().unwrap_or_else(|| format!("{err:?}")),
    }
}
