//! Invitation and QR delivery tests against a mock SMS/MMS gateway.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{Json, Router, extract::State, routing::get, routing::post};
use banquet_server::messaging::MmsClient;
use common::spawn_app;
use serde_json::{Value, json};

/// Mock ClickSend-style gateway: counts requests, records SMS payloads, and
/// fails the Nth MMS submission (1-based) with the gateway's error envelope.
struct MockGateway {
    requests: AtomicUsize,
    sms_payloads: std::sync::Mutex<Vec<Value>>,
    fail_on: Option<usize>,
}

async fn spawn_gateway(fail_on: Option<usize>) -> (String, Arc<MockGateway>) {
    let gateway = Arc::new(MockGateway {
        requests: AtomicUsize::new(0),
        sms_payloads: std::sync::Mutex::new(Vec::new()),
        fail_on,
    });

    async fn mms_send(State(gw): State<Arc<MockGateway>>, Json(_body): Json<Value>) -> Json<Value> {
        let n = gw.requests.fetch_add(1, Ordering::SeqCst) + 1;
        if gw.fail_on == Some(n) {
            Json(json!({
                "response_code": "FAILED",
                "response_msg": "Insufficient credit",
            }))
        } else {
            Json(json!({
                "response_code": "SUCCESS",
                "data": { "messages": [{ "message_id": format!("msg-{n}"), "status": "SUCCESS" }] },
            }))
        }
    }

    async fn sms_send(State(gw): State<Arc<MockGateway>>, Json(body): Json<Value>) -> Json<Value> {
        gw.requests.fetch_add(1, Ordering::SeqCst);
        let count = body["messages"].as_array().map(Vec::len).unwrap_or(0);
        gw.sms_payloads.lock().unwrap().push(body.clone());
        let messages: Vec<Value> = (0..count)
            .map(|i| json!({ "message_id": format!("sms-{i}"), "status": "SUCCESS" }))
            .collect();
        Json(json!({
            "response_code": "SUCCESS",
            "data": { "messages": messages },
        }))
    }

    async fn account(State(_gw): State<Arc<MockGateway>>) -> Json<Value> {
        Json(json!({ "data": { "balance": 42.5, "currency": "AUD" } }))
    }

    let app = Router::new()
        .route("/mms/send", post(mms_send))
        .route("/sms/send", post(sms_send))
        .route("/account", get(account))
        .with_state(gateway.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind gateway");
    let url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve gateway");
    });

    (url, gateway)
}

#[tokio::test]
async fn bulk_invitation_continues_past_a_failed_recipient() {
    let (gateway_url, gateway) = spawn_gateway(Some(2)).await;
    let server = spawn_app(Some(&gateway_url)).await;

    server.save_settings(Some("/images/invite.jpg")).await;

    let mut ids = Vec::new();
    for (name, phone) in [
        ("Alice", "0412000001"),
        ("Bob", "0412000002"),
        ("Cara", "0412000003"),
    ] {
        let guest = server.create_guest(name, phone).await;
        ids.push(guest["id"].as_str().unwrap().to_string());
    }

    let resp = server
        .post("/api/mms/send-invitation", json!({ "guest_ids": ids }))
        .await;
    assert_eq!(resp.status(), 200);
    let report: Value = resp.json().await.unwrap();
    assert_eq!(report["success"], 2);
    assert_eq!(report["failed"], 1);
    assert_eq!(gateway.requests.load(Ordering::SeqCst), 3);

    let failed: Vec<&Value> = report["results"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["success"] == false)
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["error"], "Insufficient credit");

    // sent timestamps stamped only on acceptance
    let resp = server.get("/api/guests").await;
    let guests: Vec<Value> = resp.json().await.unwrap();
    let stamped = guests
        .iter()
        .filter(|g| g["invitation_sent_at"].is_string())
        .count();
    assert_eq!(stamped, 2);

    // every attempt is logged
    let resp = server.get("/api/mms/log").await;
    let log: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(log.len(), 3);
    assert_eq!(
        log.iter().filter(|l| l["status"] == "failed").count(),
        1
    );
    assert!(
        log.iter()
            .all(|l| l["message_type"] == "invitation")
    );
}

#[tokio::test]
async fn invitation_requires_settings_and_image() {
    let (gateway_url, _gateway) = spawn_gateway(None).await;
    let server = spawn_app(Some(&gateway_url)).await;

    let guest = server.create_guest("Alice", "0412000001").await;
    let id = guest["id"].as_str().unwrap().to_string();

    // no settings row yet
    let resp = server
        .post("/api/mms/send-invitation", json!({ "guest_ids": [id] }))
        .await;
    assert_eq!(resp.status(), 400);

    // settings without an invitation image
    server.save_settings(None).await;
    let bob = server.create_guest("Bob", "0412000002").await;
    let bob_id = bob["id"].as_str().unwrap();
    let resp = server
        .post(
            "/api/mms/send-invitation",
            json!({ "guest_ids": [bob_id] }),
        )
        .await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("invitation image"));
}

#[tokio::test]
async fn qr_send_generates_token_image_and_landing_page() {
    let (gateway_url, gateway) = spawn_gateway(None).await;
    let server = spawn_app(Some(&gateway_url)).await;

    server.save_settings(None).await;
    let guest = server.create_guest("Alice", "0412000001").await;
    let id = guest["id"].as_str().unwrap().to_string();

    let resp = server
        .post("/api/mms/send-qr", json!({ "guest_ids": [id] }))
        .await;
    assert_eq!(resp.status(), 200);
    let report: Value = resp.json().await.unwrap();
    assert_eq!(report["success"], 1);
    assert_eq!(gateway.requests.load(Ordering::SeqCst), 1);

    // token persisted on the guest
    let resp = server.get("/api/guests").await;
    let guests: Vec<Value> = resp.json().await.unwrap();
    let token = guests[0]["qr_code"].as_str().unwrap().to_string();
    assert!(token.starts_with("WED_"));
    assert!(guests[0]["qr_sent_at"].is_string());

    // rendered JPEG stored under the images dir
    let image_path = server
        .state
        .config
        .images_dir()
        .join(format!("qr_{token}.jpg"));
    assert!(image_path.exists());

    // the public landing page resolves the token
    let resp = server
        .client
        .get(server.url(&format!("/api/qr/{token}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["guest_name"], "Alice");
    assert!(body["table_name"].is_null());
}

#[tokio::test]
async fn qr_resend_reuses_the_existing_token() {
    let (gateway_url, _gateway) = spawn_gateway(None).await;
    let server = spawn_app(Some(&gateway_url)).await;

    server.save_settings(None).await;
    let guest = server.create_guest("Alice", "0412000001").await;
    let id = guest["id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let resp = server
            .post("/api/mms/send-qr", json!({ "guest_ids": [&id] }))
            .await;
        assert_eq!(resp.status(), 200);
    }

    let resp = server.get("/api/guests").await;
    let guests: Vec<Value> = resp.json().await.unwrap();
    let token = guests[0]["qr_code"].as_str().unwrap();

    // exactly one image on disk for this guest
    let dir = server.state.config.images_dir();
    let qr_files: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("qr_"))
        .collect();
    assert_eq!(qr_files.len(), 1);
    assert!(
        qr_files[0]
            .file_name()
            .to_string_lossy()
            .contains(&token["WED_".len()..])
    );
}

#[tokio::test]
async fn qr_message_names_the_assigned_table() {
    let (gateway_url, _gateway) = spawn_gateway(None).await;
    let server = spawn_app(Some(&gateway_url)).await;

    server.save_settings(None).await;
    let table: Value = server
        .post("/api/tables", json!({ "name": "Table 5", "shape": "round" }))
        .await
        .json()
        .await
        .unwrap();
    let guest = server.create_guest("Alice", "0412000001").await;
    let id = guest["id"].as_str().unwrap().to_string();
    server
        .post(
            "/api/assignments",
            json!({ "guest_id": id, "table_id": table["id"].as_str().unwrap() }),
        )
        .await;

    let resp = server
        .post("/api/mms/send-qr", json!({ "guest_ids": [id] }))
        .await;
    assert_eq!(resp.status(), 200);

    let resp = server.get("/api/guests").await;
    let guests: Vec<Value> = resp.json().await.unwrap();
    let token = guests[0]["qr_code"].as_str().unwrap();

    let resp = server
        .client
        .get(server.url(&format!("/api/qr/{token}")))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["table_name"], "Table 5");
}

#[tokio::test]
async fn reminders_go_out_as_one_batched_sms_request() {
    let (gateway_url, gateway) = spawn_gateway(None).await;
    let server = spawn_app(Some(&gateway_url)).await;

    server.save_settings(None).await;
    let mut ids = Vec::new();
    for (name, phone) in [("Alice", "0412000001"), ("Bob", "0412000002")] {
        let guest = server.create_guest(name, phone).await;
        ids.push(guest["id"].as_str().unwrap().to_string());
    }

    let resp = server
        .post("/api/mms/send-reminder", json!({ "guest_ids": ids }))
        .await;
    assert_eq!(resp.status(), 200);
    let report: Value = resp.json().await.unwrap();
    assert_eq!(report["success"], 2);
    assert_eq!(report["failed"], 0);
    // batched: one gateway request for both recipients
    assert_eq!(gateway.requests.load(Ordering::SeqCst), 1);

    let resp = server.get("/api/mms/log").await;
    let log: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(log.len(), 2);
    assert!(log.iter().all(|l| l["message_type"] == "reminder"));
}

#[tokio::test]
async fn gateway_balance_is_exposed_with_currency() {
    let (gateway_url, _gateway) = spawn_gateway(None).await;
    let server = spawn_app(Some(&gateway_url)).await;

    let resp = server.get("/api/mms/balance").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["balance"], 42.5);
    assert_eq!(body["currency"], "AUD");
}

#[tokio::test]
async fn unreachable_gateway_reports_balance_as_null() {
    // nothing listens on this port
    let server = spawn_app(Some("http://127.0.0.1:1")).await;

    let resp = server.get("/api/mms/balance").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body.is_null());
}

#[tokio::test]
async fn single_sms_normalizes_the_recipient_number() {
    let (gateway_url, gateway) = spawn_gateway(None).await;

    let config = common::test_config("/tmp", "http://localhost", Some(&gateway_url));
    let client = MmsClient::from_config(&config).unwrap();

    // local form goes in, E.164 goes over the wire
    let outcome = client.send_sms("0412 000 001", "See you Saturday!").await;
    assert!(outcome.success);
    assert!(outcome.message_id.is_some());

    let payloads = gateway.sms_payloads.lock().unwrap();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0]["messages"][0]["to"], "+61412000001");
}

#[tokio::test]
async fn messaging_without_credentials_is_a_server_misconfiguration() {
    let server = spawn_app(None).await;
    server.save_settings(Some("/images/invite.jpg")).await;
    let guest = server.create_guest("Alice", "0412000001").await;
    let id = guest["id"].as_str().unwrap().to_string();

    let resp = server
        .post("/api/mms/send-invitation", json!({ "guest_ids": [id] }))
        .await;
    assert_eq!(resp.status(), 500);
}
