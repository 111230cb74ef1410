use shared::{NutritionFacts, PredictResponse};

use crate::error::SubmissionError;
use crate::service::RawResponse;

/// Parsed outcome of a successful recognition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredictionResult {
    pub food_name: Option<String>,
    pub nutrition: NutritionFacts,
    pub message: Option<String>,
}

/// Maps a raw service reply onto the result or the error taxonomy.
///
/// A body with `status: "error"` and a non-blank `message` is a domain error on
/// any HTTP status. A success body is only accepted with a 2xx status.
/// Everything else is a transport failure.
pub fn classify(response: &RawResponse) -> Result<PredictionResult, SubmissionError> {
    let parsed = serde_json::from_slice::<PredictResponse>(&response.body);

    match parsed {
        Ok(PredictResponse::Error {
            message: Some(message),
        }) if !message.trim().is_empty() => Err(SubmissionError::ServiceDomainError(message)),
        Ok(PredictResponse::Error { .. }) => Err(SubmissionError::transport(format!(
            "HTTP {}: error body without message",
            response.status
        ))),
        Ok(PredictResponse::Success {
            food_name,
            nutrition,
            message,
        }) if response.is_success() => Ok(PredictionResult {
            food_name,
            nutrition: nutrition.unwrap_or_default(),
            message,
        }),
        Ok(PredictResponse::Success { .. }) => Err(SubmissionError::transport(format!(
            "HTTP {}: success body on failed request",
            response.status
        ))),
        Err(e) => Err(SubmissionError::transport(format!(
            "HTTP {}: unparseable body: {}",
            response.status, e
        ))),
    }
}
