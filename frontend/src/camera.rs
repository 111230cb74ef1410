use std::cell::{Cell, RefCell};
use std::rc::Rc;

use client::{CameraCapability, CameraError, Facing};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};
use yew::Callback;

pub const VIDEO_ELEMENT_ID: &str = "camera-feed";

/// Camera backed by `getUserMedia`, rendering into a `<video>` element.
///
/// The browser answers the permission prompt after `activate` has returned,
/// so a refusal is reported through `on_failure`.
pub struct BrowserCamera {
    video_element_id: &'static str,
    on_failure: Callback<String>,
}

/// Stream slot filled once the browser grants access.
#[derive(Default)]
pub struct CameraStream {
    stream: Rc<RefCell<Option<MediaStream>>>,
    closed: Rc<Cell<bool>>,
}

impl BrowserCamera {
    pub fn new(video_element_id: &'static str, on_failure: Callback<String>) -> Self {
        Self {
            video_element_id,
            on_failure,
        }
    }
}

fn find_video(id: &str) -> Option<HtmlVideoElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlVideoElement>()
        .ok()
}

fn describe(err: &JsValue) -> String {
    js_sys::Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("{:?}", err))
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

impl CameraCapability for BrowserCamera {
    type Handle = CameraStream;

    fn activate(&mut self, facing: Facing) -> Result<CameraStream, CameraError> {
        let window = web_sys::window().ok_or(CameraError::NotSupported)?;
        let devices = window
            .navigator()
            .media_devices()
            .map_err(|_| CameraError::NotSupported)?;

        let video = js_sys::Object::new();
        js_sys::Reflect::set(
            &video,
            &JsValue::from_str("facingMode"),
            &JsValue::from_str(&facing.to_string()),
        )
        .map_err(|e| CameraError::Device(format!("{:?}", e)))?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::FALSE);
        constraints.set_video(&video);

        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| CameraError::Denied(format!("{:?}", e)))?;

        let handle = CameraStream::default();
        let slot = Rc::clone(&handle.stream);
        let closed = Rc::clone(&handle.closed);
        let video_element_id = self.video_element_id;
        let on_failure = self.on_failure.clone();

        spawn_local(async move {
            let result = JsFuture::from(promise).await.and_then(|value| {
                value
                    .dyn_into::<MediaStream>()
                    .map_err(|_| JsValue::from_str("getUserMedia did not return a MediaStream"))
            });
            let stream = match result {
                Ok(stream) => stream,
                Err(err) => {
                    let reason = describe(&err);
                    log::error!("Camera access failed: {}", reason);
                    // A handle that was already released has nobody to notify.
                    if !closed.get() {
                        on_failure.emit(reason);
                    }
                    return;
                }
            };

            // Turned off before the browser answered.
            if closed.get() {
                stop_tracks(&stream);
                return;
            }

            if let Some(video) = find_video(video_element_id) {
                video.set_src_object(Some(&stream));
                let _ = video.play();
            }
            *slot.borrow_mut() = Some(stream);
        });

        Ok(handle)
    }

    fn deactivate(&mut self, handle: CameraStream) {
        handle.closed.set(true);
        if let Some(stream) = handle.stream.borrow_mut().take() {
            stop_tracks(&stream);
        }
        if let Some(video) = find_video(self.video_element_id) {
            video.set_src_object(None);
        }
    }

    fn capture_still_image(&mut self, handle: &CameraStream) -> Option<String> {
        if handle.stream.borrow().is_none() {
            return None;
        }

        let video = find_video(self.video_element_id)?;
        let (width, height) = (video.video_width(), video.video_height());
        if width == 0 || height == 0 {
            return None;
        }

        let canvas = web_sys::window()?
            .document()?
            .create_element("canvas")
            .ok()?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        canvas.set_width(width);
        canvas.set_height(height);

        let context = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        context
            .draw_image_with_html_video_element(&video, 0.0, 0.0)
            .ok()?;

        canvas.to_data_url_with_type("image/jpeg").ok()
    }
}
