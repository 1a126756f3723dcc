use std::rc::Rc;

use log::{debug, error, warn};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlVideoElement;
use yew::prelude::*;

use super::{
    camera_controls::CameraControls, camera_view::CameraView,
    permission_overlay::PermissionOverlay, zoom_indicator::ZoomIndicator,
};
use crate::config::ViewerConfig;
use crate::error::CameraError;
use crate::media::MediaCamera;
use crate::model::{SessionAction, SessionState};
use crate::state::{FacingMode, RenderInstruction, ZoomAction, ZoomController, ZoomState, ZoomUpdate};

/// What the surface currently shows. A hardware constraint renders the frame
/// unscaled as soon as it is issued; a failure arrives later as a visual scale.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ZoomView {
    pub state: ZoomState,
    pub render: RenderInstruction,
}

pub enum ZoomViewAction {
    Apply(ZoomUpdate),
    /// Capabilities arrived for the current session.
    Attach(ZoomState),
    Reset,
}

impl Reducible for ZoomView {
    type Action = ZoomViewAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = match action {
            ZoomViewAction::Apply(update) => ZoomView {
                state: update.state,
                render: match update.action {
                    ZoomAction::Render(render) => render,
                    ZoomAction::ApplyConstraint(_) => RenderInstruction::HardwareZoom,
                },
            },
            ZoomViewAction::Attach(state) => ZoomView {
                state,
                render: self.render,
            },
            ZoomViewAction::Reset => ZoomView::default(),
        };
        if next == *self {
            return self;
        }
        Rc::new(next)
    }
}

#[derive(Clone, Copy, Debug)]
enum ZoomCommand {
    In,
    Out,
    To(f64),
}

#[derive(Properties, PartialEq, Clone)]
pub struct AppProps {
    pub config: Rc<ViewerConfig>,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let config = props.config.clone();
    let session = use_reducer({
        let facing = config.initial_facing;
        move || SessionState::new(facing)
    });
    let zoom_view = use_reducer(ZoomView::default);
    let controller = use_mut_ref({
        let step = config.zoom_step;
        move || ZoomController::new(step)
    });
    let camera = use_mut_ref(|| None::<MediaCamera>);
    let video_ref = use_node_ref();

    // (Re)start the camera session for a facing mode
    let start_camera = {
        let session = session.dispatcher();
        let zoom_view = zoom_view.dispatcher();
        let controller = controller.clone();
        let camera = camera.clone();
        let video_ref = video_ref.clone();
        let config = config.clone();
        Callback::from(move |facing: FacingMode| {
            if let Some(old) = camera.borrow_mut().take() {
                old.release();
            }
            let generation = controller.borrow_mut().begin_session();
            zoom_view.dispatch(ZoomViewAction::Reset);
            session.dispatch(SessionAction::Begin { generation, facing });

            let session = session.clone();
            let zoom_view = zoom_view.clone();
            let controller = controller.clone();
            let camera = camera.clone();
            let video_ref = video_ref.clone();
            let config = config.clone();
            spawn_local(async move {
                let cam = match MediaCamera::acquire(facing, &config).await {
                    Ok(cam) => cam,
                    Err(err) => {
                        error!("camera access failed: {err}");
                        session.dispatch(SessionAction::Failed { generation, error: err });
                        return;
                    }
                };
                if !controller.borrow().is_current(generation) {
                    debug!("camera session {} superseded, releasing stream", generation.get());
                    cam.release();
                    return;
                }

                let caps = cam.capabilities();
                let state = {
                    let mut c = controller.borrow_mut();
                    c.attach_capabilities(generation, caps);
                    c.state()
                };
                zoom_view.dispatch(ZoomViewAction::Attach(state));
                *camera.borrow_mut() = Some(cam.clone());
                session.dispatch(SessionAction::Live { generation });

                let Some(video) = video_ref.cast::<HtmlVideoElement>() else {
                    warn!("video element not mounted, skipping playback");
                    return;
                };
                if let Err(err) = cam.attach_to(&video).await {
                    error!("camera playback failed: {err}");
                    if controller.borrow().is_current(generation) {
                        if let Some(cam) = camera.borrow_mut().take() {
                            cam.release();
                        }
                    }
                    session.dispatch(SessionAction::Failed { generation, error: err });
                }
            });
        })
    };

    // Mount: start the initial session; unmount: release the stream
    {
        let start_camera = start_camera.clone();
        let controller = controller.clone();
        let camera = camera.clone();
        let facing = config.initial_facing;
        use_effect_with((), move |_| {
            start_camera.emit(facing);
            move || {
                // invalidates any acquisition still in flight
                controller.borrow_mut().begin_session();
                if let Some(cam) = camera.borrow_mut().take() {
                    cam.release();
                }
            }
        });
    }

    let zoom = {
        let zoom_view = zoom_view.dispatcher();
        let controller = controller.clone();
        let camera = camera.clone();
        Callback::from(move |cmd: ZoomCommand| {
            let update = {
                let mut c = controller.borrow_mut();
                match cmd {
                    ZoomCommand::In => c.zoom_in(),
                    ZoomCommand::Out => c.zoom_out(),
                    ZoomCommand::To(scale) => c.request_zoom(scale),
                }
            };
            zoom_view.dispatch(ZoomViewAction::Apply(update));

            let ZoomAction::ApplyConstraint(request) = update.action else {
                return;
            };
            let cam = camera.borrow().clone();
            let zoom_view = zoom_view.clone();
            let controller = controller.clone();
            spawn_local(async move {
                let result = match cam {
                    Some(cam) => cam.apply_zoom(request.normalized).await,
                    None => Err(CameraError::ConstraintApplicationFailure("no active camera".into())),
                };
                let settled = controller.borrow_mut().settle_constraint(request.ticket, result);
                if let Some(update) = settled {
                    zoom_view.dispatch(ZoomViewAction::Apply(update));
                }
            });
        })
    };

    let on_zoom_in = {
        let zoom = zoom.clone();
        Callback::from(move |_: ()| zoom.emit(ZoomCommand::In))
    };
    let on_zoom_out = {
        let zoom = zoom.clone();
        Callback::from(move |_: ()| zoom.emit(ZoomCommand::Out))
    };
    let on_pinch = {
        let zoom = zoom.clone();
        Callback::from(move |scale: f64| zoom.emit(ZoomCommand::To(scale)))
    };
    let current_scale = {
        let controller = controller.clone();
        Callback::from(move |_: ()| controller.borrow().state().scale)
    };
    let on_toggle_facing = {
        let start_camera = start_camera.clone();
        let facing = session.facing;
        Callback::from(move |_: ()| start_camera.emit(facing.toggled()))
    };
    let on_retry = {
        let start_camera = start_camera.clone();
        let facing = session.facing;
        Callback::from(move |_: ()| start_camera.emit(facing))
    };

    let live = session.is_live();
    let error = session.error().cloned();
    let (can_zoom_in, can_zoom_out) = {
        let c = controller.borrow();
        (c.can_zoom_in(), c.can_zoom_out())
    };

    html! {
        <div style="min-height:100vh; background:#000; color:#fff; font-family:system-ui, sans-serif;">
            <div style="position:relative; height:100vh; display:flex; flex-direction:column;">
                <CameraView
                    video_ref={video_ref.clone()}
                    visible={live}
                    render={zoom_view.render}
                    current_scale={current_scale}
                    on_pinch={on_pinch}
                >
                    <PermissionOverlay
                        show={!live || error.is_some()}
                        requesting={session.is_requesting()}
                        error={error.clone()}
                        on_retry={on_retry}
                    />
                    <ZoomIndicator show={live} state={zoom_view.state} />
                </CameraView>
                <CameraControls
                    show={live && error.is_none()}
                    can_zoom_in={can_zoom_in}
                    can_zoom_out={can_zoom_out}
                    on_zoom_in={on_zoom_in}
                    on_zoom_out={on_zoom_out}
                    on_toggle_facing={on_toggle_facing}
                />
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CameraCapabilities;

    fn reduce(view: ZoomView, action: ZoomViewAction) -> ZoomView {
        *Rc::new(view).reduce(action)
    }

    fn optical_controller() -> ZoomController {
        let mut c = ZoomController::default();
        let generation = c.begin_session();
        c.attach_capabilities(generation, CameraCapabilities::with_optical_zoom(1.0, 4.0));
        c
    }

    #[test]
    fn attach_shows_optical_mode_from_session_start() {
        let c = optical_controller();
        let view = reduce(ZoomView::default(), ZoomViewAction::Attach(c.state()));
        assert!(view.state.uses_optical_zoom);
        assert_eq!(view.state.scale, 1.0);
        assert_eq!(view.render.css_scale(), 1.0);
    }

    #[test]
    fn constraint_request_renders_unscaled_immediately() {
        let mut c = optical_controller();
        let view = reduce(ZoomView::default(), ZoomViewAction::Apply(c.request_zoom(2.0)));
        assert_eq!(view.render, RenderInstruction::HardwareZoom);
        assert_eq!(view.state.scale, 2.0);
    }

    #[test]
    fn failed_optical_then_rerequest_does_not_stack_scales() {
        let mut c = optical_controller();
        let first = c.request_zoom(3.0);
        let ZoomAction::ApplyConstraint(req) = first.action else {
            panic!("expected constraint");
        };
        let view = reduce(ZoomView::default(), ZoomViewAction::Apply(first));

        let failed = c
            .settle_constraint(req.ticket, Err(CameraError::ConstraintApplicationFailure("no".into())))
            .unwrap();
        let view = reduce(view, ZoomViewAction::Apply(failed));
        assert_eq!(view.render, RenderInstruction::VisualScale(3.0));
        assert!(!view.state.uses_optical_zoom);

        let view = reduce(view, ZoomViewAction::Apply(c.request_zoom(4.0)));
        assert_eq!(view.render, RenderInstruction::HardwareZoom);
        assert_eq!(view.render.css_scale(), 1.0);
        assert_eq!(view.state.scale, 4.0);
        assert!(view.state.uses_optical_zoom);

        assert_eq!(reduce(view, ZoomViewAction::Reset), ZoomView::default());
    }
}
