use super::super::{Model, Msg};
use super::utils::{debounce, extract_image_files};
use client::SourceMode;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <div class="upload-section">
            { render_file_input_area(model, ctx) }
            { render_camera_controls(model, ctx) }
        </div>
    }
}

fn render_file_input_area(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let files = input.files();
        let files_to_process = files.as_ref().map(extract_image_files).unwrap_or_default();

        input.set_value("");

        if !files_to_process.is_empty() {
            Msg::FilesAdded(files_to_process)
        } else {
            Msg::SetError(Some("No valid image files selected.".into()))
        }
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = Callback::from(|_| {
        if let Some(input) = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id("file-input"))
        {
            if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                html_input.click();
            }
        }
    });

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept="image/*"
                style="display: none;"
                onchange={handle_change}
            />

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Drag & drop a food photo here, paste, or click"}</p>
                    <p class="file-types">{"Supported formats: JPG, PNG, WEBP, GIF"}</p>
                </div>
            </div>
        </>
    }
}

fn render_camera_controls(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let state = model.acquisition.state();
    let camera_active = state.camera_active();

    html! {
        <div class={classes!("camera-controls", (state.source_mode() == SourceMode::Camera).then_some("selected"))}>
            <button class="analyze-btn" onclick={link.callback(|_| Msg::ToggleCamera)}>
                <i class="fa-solid fa-camera"></i>
                { if camera_active { " Cancel Camera" } else { " Use Camera" } }
            </button>
            if camera_active {
                <video id={crate::camera::VIDEO_ELEMENT_ID} autoplay=true muted=true playsinline=true />
                <button class="analyze-btn" onclick={link.callback(|_| Msg::CaptureFrame)}>
                    <i class="fa-solid fa-circle-dot"></i>{" Capture Photo"}
                </button>
                <button class="analyze-btn" onclick={link.callback(|_| Msg::SwitchFacing)}>
                    <i class="fa-solid fa-camera-rotate"></i>{" Switch Camera"}
                </button>
            }
        </div>
    }
}
