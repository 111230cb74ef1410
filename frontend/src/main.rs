mod api;
mod camera;
mod components;

use std::rc::Rc;

use api::GlooRecognitionService;
use camera::BrowserCamera;
use client::{AcquisitionController, ClientConfig, SubmissionState, SubmissionWorkflow};
use components::handlers;
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

// Yew msg components
enum Msg {
    // Image source
    FilesAdded(Vec<GlooFile>),
    FileLoaded {
        name: String,
        media_type: String,
        bytes: Vec<u8>,
    },
    ToggleCamera,
    CameraFailed(String),
    SwitchFacing,
    CaptureFrame,

    // Recognition
    Submit,
    SubmissionChanged(SubmissionState),

    // UI states
    SetError(Option<String>),
    SetDragging(bool),

    // Input events
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
}

// Main component
struct Model {
    acquisition: AcquisitionController<BrowserCamera>,
    workflow: Rc<SubmissionWorkflow<GlooRecognitionService>>,
    submission: SubmissionState,
    preview_url: Option<ObjectUrl>,
    error: Option<String>,
    is_dragging: bool,
    paste_listener: Option<EventListener>,
}

fn service_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    if let Some(base_url) = option_env!("FOOD_API_URL") {
        config.base_url = base_url.to_string();
    }
    if config.endpoint().is_err() {
        log::error!("Invalid FOOD_API_URL {:?}, using default", config.base_url);
        config = ClientConfig::default();
    }
    config
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = service_config();
        let workflow = Rc::new(SubmissionWorkflow::with_policy(
            GlooRecognitionService::new(&config),
            config.race_policy,
        ));

        // Forward every published submission state to the view.
        let mut updates = workflow.subscribe();
        let link = ctx.link().clone();
        spawn_local(async move {
            while updates.changed().await.is_ok() {
                let state = updates.borrow_and_update().clone();
                link.send_message(Msg::SubmissionChanged(state));
            }
        });

        let mut model = Self {
            acquisition: AcquisitionController::with_facing(
                BrowserCamera::new(
                    camera::VIDEO_ELEMENT_ID,
                    ctx.link().callback(Msg::CameraFailed),
                ),
                config.default_facing,
            ),
            workflow,
            submission: SubmissionState::Idle,
            preview_url: None,
            error: None,
            is_dragging: false,
            paste_listener: None,
        };

        if let Some(window) = web_sys::window() {
            let link = ctx.link().clone();
            let listener = EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            });
            model.paste_listener = Some(listener);
        }

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Image source
            Msg::FilesAdded(files) => handlers::handle_files_added(self, ctx, files),
            Msg::FileLoaded {
                name,
                media_type,
                bytes,
            } => handlers::handle_file_loaded(self, name, media_type, bytes),
            Msg::ToggleCamera => handlers::handle_toggle_camera(self),
            Msg::CameraFailed(reason) => handlers::handle_camera_failed(self, reason),
            Msg::SwitchFacing => handlers::handle_switch_facing(self),
            Msg::CaptureFrame => handlers::handle_capture_frame(self),

            // Recognition
            Msg::Submit => handlers::handle_submit(self),
            Msg::SubmissionChanged(state) => {
                self.submission = state;
                true
            }

            // UI states
            Msg::SetError(error) => {
                self.error = error;
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }

            // Input events
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { components::header::render_header() }

                <main class="main-content">
                { components::upload_section::render_upload_section(self, ctx) }
                { components::preview_area::render_preview_area(self, ctx) }
                { components::utils::render_error_message(self) }
                { components::results::render_results(self) }
                </main>

                <footer class="app-footer">
                    <p>{"Food Recognition | Rust WASM"}</p>
                </footer>
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
