use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, error, info, warn};
use serde::Deserialize;
use strum_macros::{Display, EnumString};
use tokio::sync::watch;

use crate::error::SubmissionError;
use crate::payload::Payload;
use crate::response::{PredictionResult, classify};
use crate::service::RecognitionService;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded(PredictionResult),
    Failed(SubmissionError),
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            SubmissionState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmissionState::Failed(err) => Some(err.user_message()),
            _ => None,
        }
    }
}

/// What happens when overlapping submissions settle out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RacePolicy {
    /// Only the most recently issued submission may settle the state; older
    /// responses are dropped when they arrive.
    #[default]
    LatestIssued,
    /// Whichever response arrives last wins, regardless of issue order.
    LastSettled,
}

/// Drives request/response cycles against the recognition service and
/// publishes the resulting [`SubmissionState`].
pub struct SubmissionWorkflow<S> {
    service: S,
    policy: RacePolicy,
    issued: AtomicU64,
    state: watch::Sender<SubmissionState>,
}

impl<S: RecognitionService> SubmissionWorkflow<S> {
    pub fn new(service: S) -> Self {
        Self::with_policy(service, RacePolicy::default())
    }

    pub fn with_policy(service: S, policy: RacePolicy) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            service,
            policy,
            issued: AtomicU64::new(0),
            state,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every published state change.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Sends `payload` once and returns how this attempt settled. The shared
    /// state may end up elsewhere if another submission overlapped it.
    pub async fn submit(&self, payload: Payload) -> SubmissionState {
        let attempt = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            "submission #{} started ({}, {} bytes)",
            attempt,
            payload.media_type(),
            payload.len()
        );
        self.state.send_replace(SubmissionState::Submitting);

        let outcome = match self.service.predict(&payload).await {
            Ok(response) => classify(&response),
            Err(e) => Err(SubmissionError::from(e)),
        };

        let settled = match outcome {
            Ok(result) => {
                info!(
                    "submission #{} recognized {}",
                    attempt,
                    result.food_name.as_deref().unwrap_or("<unnamed>")
                );
                SubmissionState::Succeeded(result)
            }
            Err(SubmissionError::ServiceDomainError(message)) => {
                warn!("submission #{} rejected by service: {}", attempt, message);
                SubmissionState::Failed(SubmissionError::ServiceDomainError(message))
            }
            Err(SubmissionError::TransportFailure { detail }) => {
                error!("submission #{} failed: {}", attempt, detail);
                SubmissionState::Failed(SubmissionError::TransportFailure { detail })
            }
        };

        self.settle(attempt, settled.clone());
        settled
    }

    fn settle(&self, attempt: u64, settled: SubmissionState) {
        let latest = self.issued.load(Ordering::SeqCst);
        if self.policy == RacePolicy::LatestIssued && attempt != latest {
            warn!(
                "dropping outcome of submission #{} (superseded by #{})",
                attempt, latest
            );
            return;
        }
        self.state.send_replace(settled);
    }
}
