use super::super::{Model, Msg};
use super::utils::debounce;
use client::ImageSource;
use yew::prelude::*;

pub fn render_preview_area(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link().clone();
    let has_payload = model.acquisition.payload().is_some();

    html! {
        <div id="preview-container">
            { render_image_preview(model) }
            <div class="button-container">
                <button
                    class="analyze-btn"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Submit)
                    })}
                    disabled={!has_payload || model.submission.is_submitting()}
                >
                    { render_predict_button_content(model) }
                </button>
            </div>
        </div>
    }
}

fn render_image_preview(model: &Model) -> Html {
    match &model.preview_url {
        Some(url) => {
            let alt = match model.acquisition.payload().map(|payload| payload.source()) {
                Some(ImageSource::CameraFrame) => "Captured photo",
                _ => "Selected image",
            };
            html! {
                <img id="actual-image-preview" src={url.to_string()} alt={alt} />
            }
        }
        None => html! {
            <div class="select-preview">
                <p>{"Choose a photo or take one with the camera"}</p>
            </div>
        },
    }
}

fn render_predict_button_content(model: &Model) -> Html {
    if model.submission.is_submitting() {
        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Recognizing..."}</> }
    } else {
        let label = model
            .acquisition
            .payload()
            .map(|payload| payload.file_name().to_string())
            .unwrap_or_else(|| "Image".to_string());

        let display_name = if label.chars().count() > 20 {
            format!("{}...", label.chars().take(17).collect::<String>())
        } else {
            label
        };

        html! { <><i class="fa-solid fa-utensils"></i>{ format!(" Predict \"{}\"", display_name) }</> }
    }
}
