use crate::error::CameraError;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct PermissionOverlayProps {
    pub show: bool,
    pub requesting: bool,
    pub error: Option<CameraError>,
    pub on_retry: Callback<()>,
}

#[function_component]
pub fn PermissionOverlay(props: &PermissionOverlayProps) -> Html {
    if !props.show {
        return html! {};
    }
    let retry_cb = {
        let cb = props.on_retry.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let headline = match (&props.error, props.requesting) {
        (Some(err), _) => err.user_message(),
        (None, true) => "Allow camera access",
        (None, false) => "The camera is not available",
    };
    let hint = if props.requesting && props.error.is_none() {
        "Allow camera access in the browser prompt to start the viewer."
    } else {
        "Make sure camera access is allowed in your browser settings, then retry."
    };
    let show_retry = !props.requesting || props.error.is_some();

    html! {
        <div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:#111827;">
            <div style="text-align:center; padding:24px;">
                <div style="font-size:64px; opacity:0.5; margin-bottom:24px;">{"📷"}</div>
                <h2 style="font-size:24px; font-weight:600; margin:0 0 16px 0;">{ headline }</h2>
                <p style="opacity:0.7; max-width:20rem; margin:0 auto;">{ hint }</p>
                { if show_retry {
                    html!{ <button onclick={retry_cb} style="margin-top:24px; padding:8px 24px; border:none; border-radius:9999px; background:rgba(255,255,255,0.2); color:#fff;">{"Retry"}</button> }
                } else { html!{} } }
            </div>
        </div>
    }
}
