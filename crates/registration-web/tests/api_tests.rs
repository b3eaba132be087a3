//! HTTP API tests driven through the router, no listening socket needed.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use event_registry::models::{Modality, NewEvent};
use event_registry::{event, Database, Event};
use receipt_core::mock::FixedOcr;
use receipt_core::MAX_IMAGE_BYTES;
use registration_web::{routes, AppState, ReceiptStore};
use serde_json::Value;
use tower::util::ServiceExt;
use uuid::Uuid;

/// Text the mock OCR engine "reads" from every uploaded receipt.
const RECEIPT_TEXT: &str = "Pago realizado\nMonto: Bs. 150.00";

const BOUNDARY: &str = "registration-test-boundary";

const PNG_BYTES: &[u8] = b"\x89PNG fake image bytes";
const NO_BYTES: &[u8] = b"";

async fn test_app() -> (Router, Database, PathBuf) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.migrate().await.unwrap();

    let receipts_dir = std::env::temp_dir().join(format!("api-receipts-{}", Uuid::new_v4()));
    let receipts = ReceiptStore::open(&receipts_dir).await.unwrap();

    let state = AppState::new(
        db.clone(),
        receipts,
        Some(Arc::new(FixedOcr::new(RECEIPT_TEXT))),
        "spa".to_string(),
        Duration::from_secs(5),
    );

    (routes::router().with_state(state), db, receipts_dir)
}

async fn seed_event(db: &Database, is_paid: bool) -> Event {
    event::create_event(
        db.pool(),
        &NewEvent {
            title: "Congreso de Sistemas".to_string(),
            scheduled_at: "2025-10-20T09:00:00".to_string(),
            modality: Modality::InPerson,
            venue: Some("Auditorio Central".to_string()),
            is_paid,
            cost_centavos: is_paid.then_some(15000),
            payment_qr: None,
        },
    )
    .await
    .unwrap()
}

fn text_part(body: &mut Vec<u8>, name: &str, value: &str) {
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .as_bytes(),
    );
}

fn file_part(body: &mut Vec<u8>, name: &str, content_type: &str, bytes: &[u8]) {
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
             filename=\"receipt.png\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
}

/// Build a multipart POST for the registration endpoint.
fn submission_request(
    event_id: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        text_part(&mut body, name, value);
    }
    if let Some((content_type, bytes)) = file {
        file_part(&mut body, "payment_proof", content_type, bytes);
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(format!("/api/events/{event_id}/registrations"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn valid_fields<'a>() -> Vec<(&'a str, &'a str)> {
    vec![
        ("full_name", "Ana María Rojas"),
        ("national_id", "1234567"),
        ("email", "ana@example.com"),
        ("phone", "71234567"),
    ]
}

#[tokio::test]
async fn test_health() {
    let (app, _db, dir) = test_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_list_and_get_events() {
    let (app, db, dir) = test_app().await;
    let free = seed_event(&db, false).await;
    let paid = seed_event(&db, true).await;

    let response = app.clone().oneshot(get("/api/events")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = json_body(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/events/{}", paid.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["is_paid"], true);
    assert_eq!(body["cost"], "150.00");

    let response = app
        .clone()
        .oneshot(get(&format!("/api/events/{}", free.id)))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["cost"], Value::Null);

    let response = app.oneshot(get("/api/events/no-such-event")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_free_event_registration_then_repeat() {
    let (app, db, dir) = test_app().await;
    let event = seed_event(&db, false).await;

    // Browsers send an empty file part when no file was chosen.
    let response = app
        .clone()
        .oneshot(submission_request(
            &event.id,
            &valid_fields(),
            Some(("application/octet-stream", NO_BYTES)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["outcome"], "created");
    assert_eq!(body["registration"]["email"], "ana@example.com");
    let first_id = body["registration"]["id"].as_str().unwrap().to_string();

    // Same CI again, different contact details: the original row wins.
    let mut fields = valid_fields();
    fields[2] = ("email", "ana.nueva@example.com");
    let response = app
        .oneshot(submission_request(&event.id, &fields, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["outcome"], "already_registered");
    assert_eq!(body["registration"]["id"], first_id.as_str());
    assert_eq!(body["registration"]["email"], "ana@example.com");

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_paid_event_without_proof_is_rejected() {
    let (app, db, dir) = test_app().await;
    let event = seed_event(&db, true).await;

    let response = app
        .oneshot(submission_request(&event.id, &valid_fields(), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"], "validation failed");
    assert!(body["fields"]["payment_proof"].is_string());

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_paid_event_with_proof_scans_and_serves_receipt() {
    let (app, db, dir) = test_app().await;
    let event = seed_event(&db, true).await;

    let response = app
        .clone()
        .oneshot(submission_request(
            &event.id,
            &valid_fields(),
            Some(("image/png", PNG_BYTES)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    // The mock engine read "Bs. 150.00" from the upload.
    assert_eq!(body["registration"]["ocr_amount"], "150.00");
    let reference = body["registration"]["payment_proof"].as_str().unwrap();
    assert!(reference.ends_with(".png"));
    let registration_id = body["registration"]["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(get(&format!(
            "/api/registrations/{registration_id}/receipt"
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "image/png"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], PNG_BYTES);

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_client_extracted_amount_wins() {
    let (app, db, dir) = test_app().await;
    let event = seed_event(&db, true).await;

    let mut fields = valid_fields();
    fields.push(("ocr_text", "Transferencia exitosa\nBs 80"));
    fields.push(("ocr_amount", "99.95"));
    let response = app
        .oneshot(submission_request(
            &event.id,
            &fields,
            Some(("image/png", PNG_BYTES)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["registration"]["ocr_amount"], "99.95");

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_invalid_fields_are_reported_per_field() {
    let (app, db, dir) = test_app().await;
    let event = seed_event(&db, false).await;

    let response = app
        .oneshot(submission_request(
            &event.id,
            &[
                ("full_name", "Ana María Rojas"),
                ("national_id", "12345678901"),
                ("email", "not-an-email"),
            ],
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert!(body["fields"]["national_id"].is_string());
    assert!(body["fields"]["email"].is_string());
    assert!(body["fields"]["full_name"].is_null());

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_oversized_proof_is_rejected() {
    let (app, db, dir) = test_app().await;
    let event = seed_event(&db, true).await;

    let oversized = vec![0u8; MAX_IMAGE_BYTES + 1];
    let response = app
        .oneshot(submission_request(
            &event.id,
            &valid_fields(),
            Some(("image/png", oversized.as_slice())),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    let message = body["fields"]["payment_proof"].as_str().unwrap();
    assert!(message.contains("too large"), "{message}");

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_repeat_submission_discards_second_upload() {
    let (app, db, dir) = test_app().await;
    let event = seed_event(&db, true).await;

    let request = || {
        submission_request(
            &event.id,
            &valid_fields(),
            Some(("image/png", PNG_BYTES)),
        )
    };

    let response = app.clone().oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);

    let response = app.oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_unknown_event_is_not_found() {
    let (app, _db, dir) = test_app().await;

    let response = app
        .oneshot(submission_request("no-such-event", &valid_fields(), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_suggest_attendees() {
    let (app, db, dir) = test_app().await;
    let event = seed_event(&db, false).await;

    let response = app
        .clone()
        .oneshot(submission_request(&event.id, &valid_fields(), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get("/api/attendees/suggest?q=ana"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let hits = json_body(response).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["ci"], "1234567");

    // CI digits match too.
    let response = app
        .clone()
        .oneshot(get("/api/attendees/suggest?q=34567"))
        .await
        .unwrap();
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);

    // A blank query suggests nothing.
    let response = app
        .oneshot(get("/api/attendees/suggest?q="))
        .await
        .unwrap();
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 0);

    let _ = std::fs::remove_dir_all(dir);
}
