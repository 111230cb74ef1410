use actix_web::dev::ServerHandle;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::json;

use client::{
    ClientConfig, GENERIC_FAILURE_MESSAGE, HttpRecognitionService, Payload, SubmissionError,
    SubmissionState, SubmissionWorkflow,
};

const IMAGE: &[u8] = b"\xff\xd8\xff\xe0fake-jpeg";

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

fn is_expected_upload(req: &HttpRequest, body: &[u8]) -> bool {
    let multipart = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    multipart
        && contains(body, b"name=\"file\"")
        && contains(body, b"filename=\"image.jpg\"")
        && contains(body, b"Content-Type: image/jpeg")
        && contains(body, IMAGE)
}

async fn predict(req: HttpRequest, body: web::Bytes) -> HttpResponse {
    if !is_expected_upload(&req, &body) {
        return HttpResponse::BadRequest().json(json!({"detail": "bad upload"}));
    }

    HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Food item recognized successfully.",
        "food_name": "banana",
        "nutrition": {
            "name": "banana",
            "calories": "Only available for premium subscribers.",
            "carbohydrates_total_g": 23.2,
            "cholesterol_mg": 0,
            "fat_total_g": 0.3,
            "fat_saturated_g": 0.1,
            "fiber_g": 2.6,
            "potassium_mg": 22,
            "protein_g": "Only available for premium subscribers.",
            "serving_size_g": "Only available for premium subscribers.",
            "sodium_mg": 1,
            "sugar_g": 12.3
        }
    }))
}

async fn reject() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "status": "error",
        "message": "Food item not recognized."
    }))
}

async fn crash() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({"detail": "tensor shape mismatch"}))
}

async fn start_service() -> (String, ServerHandle) {
    let server = HttpServer::new(|| {
        App::new()
            .route("/predict", web::post().to(predict))
            .route("/reject", web::post().to(reject))
            .route("/crash", web::post().to(crash))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind test server");

    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    (format!("http://{}", addr), handle)
}

fn workflow_for(base_url: &str, path: &str) -> SubmissionWorkflow<HttpRecognitionService> {
    let config = ClientConfig {
        base_url: base_url.to_string(),
        predict_path: path.to_string(),
        ..ClientConfig::default()
    };
    SubmissionWorkflow::new(HttpRecognitionService::new(&config).expect("client"))
}

fn jpeg() -> Payload {
    Payload::new(IMAGE.to_vec(), "image/jpeg")
}

#[actix_web::test]
async fn uploads_multipart_and_parses_success() {
    let (base_url, server) = start_service().await;
    let workflow = workflow_for(&base_url, "/predict");
    assert_eq!(
        workflow.service().endpoint().as_str(),
        format!("{}/predict", base_url)
    );

    let settled = workflow.submit(jpeg()).await;

    let result = settled.result().expect("success");
    assert_eq!(result.food_name.as_deref(), Some("banana"));
    assert_eq!(
        result.message.as_deref(),
        Some("Food item recognized successfully.")
    );
    assert_eq!(result.nutrition.calories, None);
    assert_eq!(result.nutrition.protein_g, None);
    assert_eq!(result.nutrition.carbohydrates_total_g, Some(23.2));
    assert_eq!(result.nutrition.potassium_mg, Some(22.0));

    server.stop(true).await;
}

#[actix_web::test]
async fn error_body_on_404_surfaces_service_message() {
    let (base_url, server) = start_service().await;
    let workflow = workflow_for(&base_url, "reject");

    workflow.submit(jpeg()).await;

    assert_eq!(
        workflow.state(),
        SubmissionState::Failed(SubmissionError::ServiceDomainError(
            "Food item not recognized.".into()
        ))
    );

    server.stop(true).await;
}

#[actix_web::test]
async fn server_crash_is_a_transport_failure() {
    let (base_url, server) = start_service().await;
    let workflow = workflow_for(&base_url, "/crash");

    let settled = workflow.submit(jpeg()).await;

    assert_eq!(settled.error_message(), Some(GENERIC_FAILURE_MESSAGE));
    assert!(matches!(
        settled,
        SubmissionState::Failed(SubmissionError::TransportFailure { ref detail }) if detail.contains("500")
    ));

    server.stop(true).await;
}

#[actix_web::test]
async fn unreachable_service_is_a_transport_failure() {
    let workflow = workflow_for("http://127.0.0.1:1", "/predict");

    let settled = workflow.submit(jpeg()).await;

    assert!(settled.result().is_none());
    assert_eq!(settled.error_message(), Some(GENERIC_FAILURE_MESSAGE));
}
