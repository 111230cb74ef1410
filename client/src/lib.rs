//! Image acquisition and submission workflow for the food recognition client.
//!
//! [`AcquisitionController`] turns a picked file or a camera frame into a
//! [`Payload`]; [`SubmissionWorkflow`] sends it to the recognition service and
//! exposes the settled [`SubmissionState`] for rendering.

pub mod acquisition;
pub mod camera;
pub mod config;
pub mod error;
pub mod payload;
pub mod response;
pub mod service;
pub mod submission;

pub use acquisition::{AcquisitionController, AcquisitionState, SourceMode};
pub use camera::{CameraCapability, Facing};
pub use config::ClientConfig;
pub use error::{
    AcquisitionError, CameraError, ConfigError, GENERIC_FAILURE_MESSAGE, SubmissionError,
    TransportError,
};
pub use payload::{ImageSource, Payload, PreviewHandle, decode_data_uri, encode_data_uri};
pub use response::{PredictionResult, classify};
#[cfg(feature = "http")]
pub use service::HttpRecognitionService;
pub use service::{RawResponse, RecognitionService};
pub use submission::{RacePolicy, SubmissionState, SubmissionWorkflow};
pub use shared::{Nutrient, NutritionFacts};
