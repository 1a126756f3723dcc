use crate::state::ZoomState;
use crate::util::format_zoom_label;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ZoomIndicatorProps {
    pub show: bool,
    pub state: ZoomState,
}

#[function_component(ZoomIndicator)]
pub fn zoom_indicator(props: &ZoomIndicatorProps) -> Html {
    if !props.show {
        return html! {};
    }
    html! {<div style="position:absolute; top:16px; left:50%; transform:translateX(-50%); background:rgba(0,0,0,0.5); padding:8px 16px; border-radius:9999px; backdrop-filter:blur(4px);">
        <span style="font-size:14px; font-weight:500;">{ format_zoom_label(&props.state) }</span>
    </div>}
}
