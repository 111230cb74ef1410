use super::super::{Model, Msg};
use super::utils::extract_image_files;
use client::Payload;
use gloo_file::{Blob, File as GlooFile, ObjectUrl};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

pub fn handle_files_added(model: &mut Model, ctx: &Context<Model>, files: Vec<GlooFile>) -> bool {
    // One image per recognition; the last one picked wins.
    let Some(file) = files.into_iter().last() else {
        model.error = Some("No valid image files selected.".into());
        return true;
    };

    model.error = None;
    let link = ctx.link().clone();
    spawn_local(async move {
        let name = file.name();
        match gloo_file::futures::read_as_bytes(&file).await {
            Ok(bytes) => link.send_message(Msg::FileLoaded {
                name,
                media_type: file.raw_mime_type(),
                bytes,
            }),
            Err(e) => link.send_message(Msg::SetError(Some(format!(
                "Could not read {}: {}",
                name, e
            )))),
        }
    });

    true
}

pub fn handle_file_loaded(
    model: &mut Model,
    name: String,
    media_type: String,
    bytes: Vec<u8>,
) -> bool {
    model
        .acquisition
        .select_payload(Payload::new(bytes, media_type).with_file_name(name));
    refresh_preview(model);
    true
}

pub fn handle_toggle_camera(model: &mut Model) -> bool {
    match model.acquisition.toggle_camera() {
        Ok(active) => {
            log::info!("Camera {}", if active { "on" } else { "off" });
            model.error = None;
        }
        Err(e) => model.error = Some(e.to_string()),
    }
    true
}

pub fn handle_camera_failed(model: &mut Model, reason: String) -> bool {
    let err = model.acquisition.camera_failed(reason);
    model.error = Some(err.to_string());
    true
}

pub fn handle_switch_facing(model: &mut Model) -> bool {
    match model.acquisition.switch_facing() {
        Ok(_) => model.error = None,
        Err(e) => model.error = Some(e.to_string()),
    }
    true
}

pub fn handle_capture_frame(model: &mut Model) -> bool {
    match model.acquisition.capture_frame() {
        Ok(_) => {
            model.error = None;
            refresh_preview(model);
        }
        Err(e) => model.error = Some(e.to_string()),
    }
    true
}

pub fn handle_submit(model: &mut Model) -> bool {
    let Some(payload) = model.acquisition.payload().cloned() else {
        model.error = Some("Choose an image or capture a photo first.".into());
        return true;
    };

    model.error = None;
    let workflow = Rc::clone(&model.workflow);
    spawn_local(async move {
        workflow.submit(payload).await;
    });

    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(file_list) = event.data_transfer().and_then(|dt| dt.files()) {
        let files = extract_image_files(&file_list);
        if files.is_empty() {
            log::warn!("Dropped items contained no image");
        }
        ctx.link().send_message(Msg::FilesAdded(files));
    }

    true
}

pub fn handle_paste(ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    if let Some(file_list) = event.clipboard_data().and_then(|dt| dt.files()) {
        let files = extract_image_files(&file_list);
        if !files.is_empty() {
            event.prevent_default();
            ctx.link().send_message(Msg::FilesAdded(files));
            return true;
        }
    }
    false
}

fn refresh_preview(model: &mut Model) {
    model.preview_url = model.acquisition.preview().map(|preview| {
        let blob = Blob::new_with_options(preview.bytes(), Some(preview.media_type()));
        ObjectUrl::from(blob)
    });
}
