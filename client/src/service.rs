use async_trait::async_trait;

use crate::error::TransportError;
use crate::payload::Payload;

/// Status code and body of one exchange with the recognition service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One `POST /predict` round trip. Implementations send the payload as a
/// multipart form with a single part named `file` and make no retries.
#[async_trait(?Send)]
pub trait RecognitionService {
    async fn predict(&self, payload: &Payload) -> Result<RawResponse, TransportError>;
}

#[cfg(feature = "http")]
pub use http::HttpRecognitionService;

#[cfg(feature = "http")]
mod http {
    use async_trait::async_trait;
    use log::debug;
    use reqwest::multipart::{Form, Part};
    use url::Url;

    use super::{RawResponse, RecognitionService};
    use crate::config::ClientConfig;
    use crate::error::{ConfigError, TransportError};
    use crate::payload::Payload;

    #[derive(Clone)]
    pub struct HttpRecognitionService {
        client: reqwest::Client,
        endpoint: Url,
    }

    impl HttpRecognitionService {
        pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
            let mut builder = reqwest::Client::builder();
            if let Some(timeout) = config.request_timeout {
                builder = builder.timeout(timeout);
            }
            let client = builder.build()?;

            Ok(Self {
                client,
                endpoint: config.endpoint()?,
            })
        }

        pub fn endpoint(&self) -> &Url {
            &self.endpoint
        }
    }

    #[async_trait(?Send)]
    impl RecognitionService for HttpRecognitionService {
        async fn predict(&self, payload: &Payload) -> Result<RawResponse, TransportError> {
            let part = Part::bytes(payload.bytes().to_vec())
                .file_name(payload.file_name().to_string())
                .mime_str(payload.media_type())
                .map_err(|e| TransportError::Request(e.to_string()))?;
            let form = Form::new().part("file", part);

            debug!("POST {} ({} bytes)", self.endpoint, payload.len());
            let response = self
                .client
                .post(self.endpoint.clone())
                .multipart(form)
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            let status = response.status().as_u16();
            let body = response
                .bytes()
                .await
                .map_err(|e| TransportError::Body(e.to_string()))?;

            Ok(RawResponse::new(status, body.to_vec()))
        }
    }
}
