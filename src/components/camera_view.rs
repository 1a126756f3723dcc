use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, HtmlElement, TouchEvent};
use yew::prelude::*;

use crate::state::{PinchTracker, RenderInstruction, TouchPoint};
use crate::util::css_scale;

#[derive(Properties, PartialEq, Clone)]
pub struct CameraViewProps {
    pub video_ref: NodeRef,
    pub visible: bool,
    pub render: RenderInstruction,
    /// Scale at the moment a pinch starts.
    pub current_scale: Callback<(), f64>,
    pub on_pinch: Callback<f64>,
    #[prop_or_default]
    pub children: Html,
}

fn touch_points(e: &TouchEvent) -> Vec<TouchPoint> {
    let touches = e.touches();
    (0..touches.length())
        .filter_map(|i| touches.item(i))
        .map(|t| TouchPoint::new(t.client_x() as f64, t.client_y() as f64))
        .collect()
}

#[function_component(CameraView)]
pub fn camera_view(props: &CameraViewProps) -> Html {
    let container_ref = use_node_ref();
    let pinch = use_mut_ref(PinchTracker::default);
    // listeners are registered once; they read the latest callbacks from here
    let callbacks = use_mut_ref(|| (props.current_scale.clone(), props.on_pinch.clone()));
    *callbacks.borrow_mut() = (props.current_scale.clone(), props.on_pinch.clone());

    {
        let container_ref = container_ref.clone();
        let pinch = pinch.clone();
        let callbacks = callbacks.clone();
        use_effect_with((), move |_| {
            let container = container_ref.cast::<HtmlElement>();

            let touch_start_cb = {
                let pinch = pinch.clone();
                let callbacks = callbacks.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    let points = touch_points(&e);
                    if points.len() == 2 {
                        let scale = callbacks.borrow().0.emit(());
                        pinch.borrow_mut().begin(&points, scale);
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let touch_move_cb = {
                let pinch = pinch.clone();
                let callbacks = callbacks.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    let points = touch_points(&e);
                    if points.len() != 2 {
                        return;
                    }
                    e.prevent_default();
                    let (current_scale, on_pinch) = callbacks.borrow().clone();
                    let requested = pinch.borrow_mut().update(&points, current_scale.emit(()));
                    if let Some(scale) = requested {
                        on_pinch.emit(scale);
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let touch_end_cb = {
                let pinch = pinch.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    pinch.borrow_mut().end(e.touches().length() as usize);
                }) as Box<dyn FnMut(_)>)
            };

            if let Some(el) = &container {
                el.add_event_listener_with_callback("touchstart", touch_start_cb.as_ref().unchecked_ref())
                    .ok();
                let opts = AddEventListenerOptions::new();
                opts.set_passive(false);
                el.add_event_listener_with_callback_and_add_event_listener_options(
                    "touchmove",
                    touch_move_cb.as_ref().unchecked_ref(),
                    &opts,
                )
                .ok();
                el.add_event_listener_with_callback("touchend", touch_end_cb.as_ref().unchecked_ref())
                    .ok();
                el.add_event_listener_with_callback("touchcancel", touch_end_cb.as_ref().unchecked_ref())
                    .ok();
            } else {
                log::warn!("camera container not mounted, pinch zoom disabled");
            }

            // Cleanup
            move || {
                if let Some(el) = container {
                    let _ = el.remove_event_listener_with_callback(
                        "touchstart",
                        touch_start_cb.as_ref().unchecked_ref(),
                    );
                    let _ = el.remove_event_listener_with_callback(
                        "touchmove",
                        touch_move_cb.as_ref().unchecked_ref(),
                    );
                    let _ = el.remove_event_listener_with_callback(
                        "touchend",
                        touch_end_cb.as_ref().unchecked_ref(),
                    );
                    let _ = el.remove_event_listener_with_callback(
                        "touchcancel",
                        touch_end_cb.as_ref().unchecked_ref(),
                    );
                }
                let _keep_alive = (&touch_start_cb, &touch_move_cb, &touch_end_cb);
            }
        });
    }

    let video_style = format!(
        "width:100%; height:100%; object-fit:cover; display:{}; transform:{}; transition:transform 0.1s ease-out;",
        if props.visible { "block" } else { "none" },
        css_scale(props.render.css_scale()),
    );

    html! {
        <div ref={container_ref} style="flex:1; position:relative; overflow:hidden; touch-action:none;">
            <video
                ref={props.video_ref.clone()}
                autoplay=true
                playsinline=true
                muted=true
                style={video_style}
            />
            { props.children.clone() }
        </div>
    }
}
