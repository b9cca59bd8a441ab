//! Integration test — drive `RasaClient` against an in-process mock Rasa server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use chatrelay_core::config::BackendConfig;
use chatrelay_core::message::{Attachment, OutboundMessage};
use chatrelay_core::messaging::rasa::RasaClient;
use chatrelay_core::messaging::{MessagingClient, MessagingError, ResponseItem};
use serde_json::{Value, json};

type Captured = Arc<Mutex<Vec<Value>>>;

/// Binds a router to an ephemeral port and returns its base URL.
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock");
    });
    format!("http://{addr}")
}

fn client(base_url: String, timeout: Duration) -> RasaClient {
    RasaClient::new(&BackendConfig {
        base_url,
        timeout,
        accept_invalid_certs: false,
    })
    .expect("client")
}

async fn echo_webhook(State(captured): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
    captured.lock().unwrap().push(body.clone());
    Json(json!([
        {"recipient_id": body["sender"], "text": "hi there"},
        {"recipient_id": body["sender"], "buttons": [{"title": "Yes", "payload": "/affirm"}]}
    ]))
}

#[tokio::test]
async fn send_posts_to_webhook_and_preserves_reply_order() {
    let captured = Captured::default();
    let app = Router::new()
        .route("/webhooks/rest/webhook", post(echo_webhook))
        .with_state(captured.clone());
    let rasa = client(spawn(app).await, Duration::from_secs(5));

    let msg = OutboundMessage::new(Some("user1".into()), Some("hello".into()), vec![]).unwrap();
    let items = rasa.send(&msg).await.expect("send");

    assert_eq!(
        items,
        vec![
            ResponseItem(json!({"recipient_id": "user1", "text": "hi there"})),
            ResponseItem(json!({
                "recipient_id": "user1",
                "buttons": [{"title": "Yes", "payload": "/affirm"}]
            })),
        ]
    );

    let bodies = captured.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0], json!({"sender": "user1", "message": "hello"}));
}

#[tokio::test]
async fn send_forwards_attachments_as_metadata() {
    let captured = Captured::default();
    let app = Router::new()
        .route("/webhooks/rest/webhook", post(echo_webhook))
        .with_state(captured.clone());
    let rasa = client(spawn(app).await, Duration::from_secs(5));

    let msg = OutboundMessage::new(
        Some("user1".into()),
        Some("my documents".into()),
        vec![
            Attachment {
                file_name: Some("a.txt".into()),
                content_type: Some("text/plain".into()),
                data: b"abc".to_vec(),
            },
            Attachment {
                file_name: None,
                content_type: None,
                data: vec![],
            },
        ],
    )
    .unwrap();
    rasa.send(&msg).await.expect("send");

    let bodies = captured.lock().unwrap();
    let attachments = &bodies[0]["metadata"]["attachments"];
    assert_eq!(attachments[0]["filename"], "a.txt");
    assert_eq!(attachments[0]["contentType"], "text/plain");
    assert_eq!(attachments[0]["size"], 3);
    assert_eq!(attachments[0]["data"], "YWJj");
    assert_eq!(attachments[1]["filename"], Value::Null);
    assert_eq!(attachments[1]["size"], 0);
}

#[tokio::test]
async fn non_success_status_maps_to_status_error() {
    let app = Router::new().route(
        "/webhooks/rest/webhook",
        post(|| async { (StatusCode::BAD_GATEWAY, "model not loaded") }),
    );
    let rasa = client(spawn(app).await, Duration::from_secs(5));

    let msg = OutboundMessage::new(Some("u".into()), Some("t".into()), vec![]).unwrap();
    match rasa.send(&msg).await {
        Err(MessagingError::Status { status, body }) => {
            assert_eq!(status, 502);
            assert_eq!(body, "model not loaded");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_array_reply_is_a_decode_error() {
    let app = Router::new().route(
        "/webhooks/rest/webhook",
        post(|| async { Json(json!({"text": "not a list"})) }),
    );
    let rasa = client(spawn(app).await, Duration::from_secs(5));

    let msg = OutboundMessage::new(Some("u".into()), Some("t".into()), vec![]).unwrap();
    let err = rasa.send(&msg).await.unwrap_err();
    assert!(matches!(err, MessagingError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn slow_backend_maps_to_timeout() {
    let app = Router::new().route(
        "/webhooks/rest/webhook",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!([]))
        }),
    );
    let rasa = client(spawn(app).await, Duration::from_millis(200));

    let msg = OutboundMessage::new(Some("u".into()), Some("t".into()), vec![]).unwrap();
    let err = rasa.send(&msg).await.unwrap_err();
    assert!(matches!(err, MessagingError::Timeout(_)), "got {err:?}");
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn unreachable_backend_maps_to_connection_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let rasa = client(format!("http://{addr}"), Duration::from_secs(5));
    let err = rasa.status().await.unwrap_err();
    assert!(matches!(err, MessagingError::Connection(_)), "got {err:?}");
}

#[tokio::test]
async fn tracker_and_status_hit_expected_paths() {
    let app = Router::new()
        .route("/", get(|| async { "Hello from Rasa: 3.6.0" }))
        .route(
            "/conversations/{sender}/tracker",
            get(|Path(sender): Path<String>| async move {
                Json(json!({"sender_id": sender, "events": []}))
            }),
        );
    let rasa = client(spawn(app).await, Duration::from_secs(5));

    rasa.status().await.expect("status");
    let tracker = rasa.tracker("user 1").await.expect("tracker");
    assert_eq!(tracker, json!({"sender_id": "user 1", "events": []}));
}
