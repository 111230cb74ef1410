use std::cell::RefCell;
use std::collections::VecDeque;
use std::pin::pin;

use async_trait::async_trait;
use futures::poll;
use tokio::sync::oneshot;

use client::{
    GENERIC_FAILURE_MESSAGE, Payload, RacePolicy, RawResponse, RecognitionService,
    SubmissionError, SubmissionState, SubmissionWorkflow, TransportError,
};

type Reply = Result<RawResponse, TransportError>;

/// Service whose replies are released by the test, one per request in issue order.
#[derive(Default)]
struct ScriptedService {
    pending: RefCell<VecDeque<oneshot::Receiver<Reply>>>,
    seen: RefCell<Vec<Payload>>,
}

impl ScriptedService {
    fn expect_request(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push_back(rx);
        tx
    }
}

#[async_trait(?Send)]
impl RecognitionService for ScriptedService {
    async fn predict(&self, payload: &Payload) -> Result<RawResponse, TransportError> {
        self.seen.borrow_mut().push(payload.clone());
        let rx = self
            .pending
            .borrow_mut()
            .pop_front()
            .expect("unexpected request");
        rx.await
            .unwrap_or_else(|_| Err(TransportError::Network("reply dropped".into())))
    }
}

fn success(food: &str, calories: f64) -> Reply {
    let body = format!(
        r#"{{"status":"success","food_name":"{}","nutrition":{{"calories":{}}}}}"#,
        food, calories
    );
    Ok(RawResponse::new(200, body.into_bytes()))
}

fn jpeg() -> Payload {
    Payload::new(b"jpeg-bytes".to_vec(), "image/jpeg")
}

fn food_name(state: &SubmissionState) -> Option<&str> {
    state.result().and_then(|r| r.food_name.as_deref())
}

#[tokio::test]
async fn full_success_is_reported_unmodified() {
    let service = ScriptedService::default();
    let reply = service.expect_request();
    let workflow = SubmissionWorkflow::new(service);
    assert_eq!(workflow.state(), SubmissionState::Idle);

    let body = br#"{"status":"success","food_name":"carrot","nutrition":{
        "calories":41.0,"carbohydrates_total_g":9.6,"cholesterol_mg":0.0,"fat_total_g":0.2,
        "fat_saturated_g":0.0,"fiber_g":2.8,"potassium_mg":33.0,"protein_g":0.9,
        "serving_size_g":100.0,"sodium_mg":69.0,"sugar_g":4.7}}"#;
    reply.send(Ok(RawResponse::new(200, body.to_vec()))).unwrap();

    let settled = workflow.submit(jpeg()).await;
    assert_eq!(settled, workflow.state());

    let result = settled.result().unwrap();
    assert_eq!(result.food_name.as_deref(), Some("carrot"));
    let n = &result.nutrition;
    assert_eq!(
        [
            n.calories,
            n.carbohydrates_total_g,
            n.cholesterol_mg,
            n.fat_total_g,
            n.fat_saturated_g,
            n.fiber_g,
            n.potassium_mg,
            n.protein_g,
            n.serving_size_g,
            n.sodium_mg,
            n.sugar_g,
        ],
        [
            Some(41.0),
            Some(9.6),
            Some(0.0),
            Some(0.2),
            Some(0.0),
            Some(2.8),
            Some(33.0),
            Some(0.9),
            Some(100.0),
            Some(69.0),
            Some(4.7),
        ]
    );
    assert_eq!(workflow.service().seen.borrow()[0], jpeg());
}

#[tokio::test]
async fn domain_error_message_is_verbatim() {
    let service = ScriptedService::default();
    service
        .expect_request()
        .send(Ok(RawResponse::new(
            404,
            br#"{"status":"error","message":"no food detected"}"#.to_vec(),
        )))
        .unwrap();
    let workflow = SubmissionWorkflow::new(service);

    workflow.submit(jpeg()).await;

    assert_eq!(
        workflow.state(),
        SubmissionState::Failed(SubmissionError::ServiceDomainError(
            "no food detected".into()
        ))
    );
    assert_eq!(workflow.state().error_message(), Some("no food detected"));
}

#[tokio::test]
async fn network_failure_gives_generic_message() {
    let service = ScriptedService::default();
    service
        .expect_request()
        .send(Err(TransportError::Network("connection refused".into())))
        .unwrap();
    let workflow = SubmissionWorkflow::new(service);

    let settled = workflow.submit(jpeg()).await;

    assert!(settled.result().is_none());
    assert_eq!(settled.error_message(), Some(GENERIC_FAILURE_MESSAGE));
    assert!(!settled.error_message().unwrap().contains("refused"));
}

#[tokio::test]
async fn state_is_submitting_while_in_flight() {
    let service = ScriptedService::default();
    let reply = service.expect_request();
    let workflow = SubmissionWorkflow::new(service);
    let mut updates = workflow.subscribe();

    let mut attempt = pin!(workflow.submit(jpeg()));
    assert!(poll!(attempt.as_mut()).is_pending());
    assert!(workflow.state().is_submitting());
    assert!(updates.has_changed().unwrap());
    assert!(updates.borrow_and_update().is_submitting());

    reply.send(success("kiwi", 61.0)).unwrap();
    attempt.await;

    assert!(updates.has_changed().unwrap());
    assert_eq!(food_name(&updates.borrow_and_update()), Some("kiwi"));
}

#[tokio::test]
async fn resubmitting_discards_previous_error() {
    let service = ScriptedService::default();
    service
        .expect_request()
        .send(Err(TransportError::Network("timeout".into())))
        .unwrap();
    let second = service.expect_request();
    let workflow = SubmissionWorkflow::new(service);

    workflow.submit(jpeg()).await;
    assert!(matches!(workflow.state(), SubmissionState::Failed(_)));

    let mut retry = pin!(workflow.submit(jpeg()));
    assert!(poll!(retry.as_mut()).is_pending());
    assert_eq!(workflow.state(), SubmissionState::Submitting);

    second.send(success("mango", 60.0)).unwrap();
    retry.await;
    assert_eq!(food_name(&workflow.state()), Some("mango"));
}

#[tokio::test]
async fn latest_issued_ignores_late_first_response() {
    let service = ScriptedService::default();
    let first_reply = service.expect_request();
    let second_reply = service.expect_request();
    let workflow = SubmissionWorkflow::with_policy(service, RacePolicy::LatestIssued);

    let mut first = pin!(workflow.submit(jpeg()));
    let mut second = pin!(workflow.submit(jpeg()));
    assert!(poll!(first.as_mut()).is_pending());
    assert!(poll!(second.as_mut()).is_pending());

    second_reply.send(success("lemon", 29.0)).unwrap();
    let second_settled = second.await;
    assert_eq!(food_name(&second_settled), Some("lemon"));
    assert_eq!(food_name(&workflow.state()), Some("lemon"));

    first_reply.send(success("grapes", 69.0)).unwrap();
    let first_settled = first.await;
    assert_eq!(food_name(&first_settled), Some("grapes"));
    assert_eq!(food_name(&workflow.state()), Some("lemon"));
}

#[tokio::test]
async fn latest_issued_keeps_submitting_when_older_settles_first() {
    let service = ScriptedService::default();
    let first_reply = service.expect_request();
    let second_reply = service.expect_request();
    let workflow = SubmissionWorkflow::with_policy(service, RacePolicy::LatestIssued);

    let mut first = pin!(workflow.submit(jpeg()));
    let mut second = pin!(workflow.submit(jpeg()));
    assert!(poll!(first.as_mut()).is_pending());
    assert!(poll!(second.as_mut()).is_pending());

    first_reply
        .send(Ok(RawResponse::new(
            200,
            br#"{"status":"error","message":"Food item not recognized."}"#.to_vec(),
        )))
        .unwrap();
    first.await;
    assert!(workflow.state().is_submitting());

    second_reply.send(success("corn", 86.0)).unwrap();
    second.await;
    assert_eq!(food_name(&workflow.state()), Some("corn"));
}

#[tokio::test]
async fn last_settled_lets_the_late_response_win() {
    let service = ScriptedService::default();
    let first_reply = service.expect_request();
    let second_reply = service.expect_request();
    let workflow = SubmissionWorkflow::with_policy(service, RacePolicy::LastSettled);

    let mut first = pin!(workflow.submit(jpeg()));
    let mut second = pin!(workflow.submit(jpeg()));
    assert!(poll!(first.as_mut()).is_pending());
    assert!(poll!(second.as_mut()).is_pending());

    second_reply.send(success("lemon", 29.0)).unwrap();
    second.await;
    assert_eq!(food_name(&workflow.state()), Some("lemon"));

    first_reply.send(success("grapes", 69.0)).unwrap();
    first.await;
    assert_eq!(food_name(&workflow.state()), Some("grapes"));
}
