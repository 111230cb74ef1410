use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-utensils"></i> {" Food Recognition"}</h1>
            <p class="subtitle">{"Upload a photo, drop or paste one, or use your camera"}</p>
        </header>
    }
}
