use async_trait::async_trait;
use client::{ClientConfig, Payload, RawResponse, RecognitionService, TransportError};
use gloo_file::Blob;
use gloo_net::http::Request;

pub struct GlooRecognitionService {
    endpoint: String,
}

impl GlooRecognitionService {
    pub fn new(config: &ClientConfig) -> Self {
        let endpoint = config
            .endpoint()
            .map(|url| url.to_string())
            .unwrap_or_else(|_| format!("{}{}", config.base_url, config.predict_path));
        Self { endpoint }
    }
}

#[async_trait(?Send)]
impl RecognitionService for GlooRecognitionService {
    async fn predict(&self, payload: &Payload) -> Result<RawResponse, TransportError> {
        let form_data =
            web_sys::FormData::new().map_err(|e| TransportError::Request(format!("{:?}", e)))?;
        let blob = Blob::new_with_options(payload.bytes(), Some(payload.media_type()));
        form_data
            .append_with_blob_and_filename("file", blob.as_ref(), payload.file_name())
            .map_err(|e| TransportError::Request(format!("{:?}", e)))?;

        let response = Request::post(&self.endpoint)
            .body(form_data)
            .map_err(|e| TransportError::Request(e.to_string()))?
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .binary()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(RawResponse::new(status, body))
    }
}
