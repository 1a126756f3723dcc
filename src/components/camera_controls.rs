use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct CameraControlsProps {
    pub show: bool,
    pub can_zoom_in: bool,
    pub can_zoom_out: bool,
    pub on_zoom_in: Callback<()>,
    pub on_zoom_out: Callback<()>,
    pub on_toggle_facing: Callback<()>,
}

const BUTTON_STYLE: &str = "display:flex; align-items:center; justify-content:center; width:64px; height:64px; border:none; border-radius:50%; background:rgba(255,255,255,0.2); color:#fff; font-size:28px; backdrop-filter:blur(4px);";

#[function_component(CameraControls)]
pub fn camera_controls(props: &CameraControlsProps) -> Html {
    if !props.show {
        return html! {};
    }
    let zi = {
        let cb = props.on_zoom_in.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let zo = {
        let cb = props.on_zoom_out.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let flip = {
        let cb = props.on_toggle_facing.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let dim = |enabled: bool| if enabled { "" } else { "opacity:0.5; cursor:not-allowed;" };
    html! {<div style="position:absolute; left:0; right:0; bottom:0; padding:32px; background:linear-gradient(to top, rgba(0,0,0,0.8), transparent);">
        <div style="display:flex; justify-content:space-between; align-items:center; max-width:28rem; margin:0 auto;">
            <button onclick={zo} disabled={!props.can_zoom_out} title="Zoom out" style={format!("{BUTTON_STYLE}{}", dim(props.can_zoom_out))}> {"−"} </button>
            <button onclick={flip} title="Switch camera" style={format!("{BUTTON_STYLE} margin:0 16px;")}> {"⇄"} </button>
            <button onclick={zi} disabled={!props.can_zoom_in} title="Zoom in" style={format!("{BUTTON_STYLE}{}", dim(props.can_zoom_in))}> {"+"} </button>
        </div>
    </div>}
}
