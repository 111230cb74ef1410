/// Shown for every transport-level failure. The underlying cause is only logged.
pub const GENERIC_FAILURE_MESSAGE: &str = "Error recognizing the food item. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AcquisitionError {
    #[error("Camera is not available. Turn on the camera and try again.")]
    CaptureUnavailable,
    #[error("Could not read the captured photo. Please capture again.")]
    MalformedFrame(String),
    #[error("Could not start the camera: {0}")]
    ActivationFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    #[error("no camera is available on this device")]
    NotSupported,
    #[error("camera access denied: {0}")]
    Denied(String),
    #[error("camera error: {0}")]
    Device(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request could not be built: {0}")]
    Request(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("response body could not be read: {0}")]
    Body(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// The service answered with `status: "error"`; the message is shown verbatim.
    #[error("{0}")]
    ServiceDomainError(String),
    #[error("Error recognizing the food item. Please try again.")]
    TransportFailure { detail: String },
}

impl SubmissionError {
    pub fn transport(detail: impl Into<String>) -> Self {
        SubmissionError::TransportFailure {
            detail: detail.into(),
        }
    }

    /// Text for the error banner.
    pub fn user_message(&self) -> &str {
        match self {
            SubmissionError::ServiceDomainError(message) => message,
            SubmissionError::TransportFailure { .. } => GENERIC_FAILURE_MESSAGE,
        }
    }
}

impl From<TransportError> for SubmissionError {
    fn from(err: TransportError) -> Self {
        SubmissionError::transport(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid service url: {0}")]
    Url(#[from] url::ParseError),
    #[cfg(feature = "http")]
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
