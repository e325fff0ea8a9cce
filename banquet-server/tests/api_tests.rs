//! End-to-end API tests over a real server with an in-memory database.

mod common;

use common::spawn_app;
use serde_json::{Value, json};

#[tokio::test]
async fn health_reports_ok() {
    let server = spawn_app(None).await;

    let resp = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn admin_routes_require_a_token() {
    let server = spawn_app(None).await;

    let resp = server
        .client
        .get(server.url("/api/guests"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = server
        .client
        .get(server.url("/api/guests"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn settings_upsert_creates_then_updates() {
    let server = spawn_app(None).await;

    let resp = server.get("/api/settings").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body.is_null());

    let saved = server.save_settings(None).await;
    assert_eq!(saved["couple_names"], "Sarah & James");

    let resp = server
        .post(
            "/api/settings",
            json!({
                "couple_names": "Sarah & James",
                "wedding_date": "2026-03-14",
                "wedding_time": "18:00",
                "venue_name": "Harbourview Terrace",
            }),
        )
        .await;
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["wedding_time"], "18:00");

    // still one row
    let resp = server.get("/api/settings").await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["wedding_time"], "18:00");
}

#[tokio::test]
async fn settings_rejects_bad_date() {
    let server = spawn_app(None).await;

    let resp = server
        .post(
            "/api/settings",
            json!({
                "couple_names": "A & B",
                "wedding_date": "14/03/2026",
                "wedding_time": "17:30",
                "venue_name": "Somewhere",
            }),
        )
        .await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn guest_creation_assigns_passcode_and_pending_rsvp() {
    let server = spawn_app(None).await;

    let guest = server.create_guest("Sarah", "0412 345 678").await;
    assert_eq!(guest["first_name"], "Sarah");
    // normalized to E.164
    assert_eq!(guest["phone"], "+61412345678");

    let passcode = guest["passcode"].as_str().unwrap();
    assert_eq!(passcode.len(), 7);
    assert!(passcode.starts_with("sara"));
    assert!(passcode[4..].chars().all(|c| c.is_ascii_digit()));

    assert_eq!(guest["rsvp"]["status"], "pending");
}

#[tokio::test]
async fn duplicate_phone_is_a_conflict() {
    let server = spawn_app(None).await;

    server.create_guest("Sarah", "0412345678").await;

    let resp = server
        .post(
            "/api/guests",
            json!({
                "first_name": "Other",
                "phone": "+61412345678",
                "plus_ones": [],
            }),
        )
        .await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("phone number already exists")
    );
}

#[tokio::test]
async fn guest_rejects_invalid_phone() {
    let server = spawn_app(None).await;

    let resp = server
        .post(
            "/api/guests",
            json!({ "first_name": "Sarah", "phone": "12345", "plus_ones": [] }),
        )
        .await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn guest_search_matches_plus_one_names() {
    let server = spawn_app(None).await;

    server.create_guest("Sarah", "0412345678").await;
    let resp = server
        .post(
            "/api/guests",
            json!({
                "first_name": "James",
                "phone": "0412345679",
                "plus_ones_allowed": 1,
                "plus_ones": [{ "name": "Margaret" }],
            }),
        )
        .await;
    assert_eq!(resp.status(), 200);

    let resp = server.get("/api/guests?search=margar").await;
    let list: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["first_name"], "James");

    let resp = server.get("/api/guests?search=nobody").await;
    let list: Vec<Value> = resp.json().await.unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn guest_update_replaces_plus_ones_wholesale() {
    let server = spawn_app(None).await;

    let guest = server.create_guest("Sarah", "0412345678").await;
    let id = guest["id"].as_str().unwrap();

    let resp = server
        .put(
            &format!("/api/guests/{id}"),
            json!({
                "first_name": "Sarah",
                "phone": "0412345678",
                "plus_ones_allowed": 2,
                "plus_ones": [{ "name": "Tom" }, { "name": "   " }, { "name": "Jerry" }],
            }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();

    let names: Vec<&str> = updated["plus_ones"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    // blank entry discarded
    assert_eq!(names, vec!["Tom", "Jerry"]);
}

#[tokio::test]
async fn guest_delete_cascades() {
    let server = spawn_app(None).await;

    let guest = server.create_guest("Sarah", "0412345678").await;
    let id = guest["id"].as_str().unwrap();

    let resp = server.delete(&format!("/api/guests/{id}")).await;
    assert_eq!(resp.status(), 200);

    let resp = server.get(&format!("/api/guests/{id}")).await;
    assert_eq!(resp.status(), 404);

    // phone is free again
    server.create_guest("Sarah", "0412345678").await;
}

#[tokio::test]
async fn floor_plan_is_lazily_created_at_default_size() {
    let server = spawn_app(None).await;

    let resp = server.get("/api/floor-plan").await;
    assert_eq!(resp.status(), 200);
    let plan: Value = resp.json().await.unwrap();
    assert_eq!(plan["width"], 1000);
    assert_eq!(plan["height"], 700);
}

#[tokio::test]
async fn table_creation_applies_shape_defaults() {
    let server = spawn_app(None).await;

    let resp = server
        .post("/api/tables", json!({ "name": "Table 1", "shape": "round" }))
        .await;
    assert_eq!(resp.status(), 200);
    let table: Value = resp.json().await.unwrap();
    assert_eq!(table["capacity"], 8);
    assert_eq!(table["width"], 80);
    assert_eq!(table["height"], 80);

    let resp = server
        .post(
            "/api/tables",
            json!({ "name": "Head Table", "shape": "rectangular" }),
        )
        .await;
    let table: Value = resp.json().await.unwrap();
    assert_eq!(table["capacity"], 6);
    assert_eq!(table["width"], 120);
}

#[tokio::test]
async fn table_positions_are_clamped_and_rounded() {
    let server = spawn_app(None).await;

    let resp = server
        .post(
            "/api/tables",
            json!({
                "name": "Drifter",
                "shape": "square",
                "position_x": 110.0,
                "position_y": -5.0,
            }),
        )
        .await;
    let table: Value = resp.json().await.unwrap();
    assert_eq!(table["position_x"], 95);
    assert_eq!(table["position_y"], 0);

    let id = table["id"].as_str().unwrap();
    let resp = server
        .put(
            "/api/tables",
            json!({ "id": id, "position_x": 42.6, "capacity": 9.4 }),
        )
        .await;
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["position_x"], 43);
    assert_eq!(updated["capacity"], 9);
}

#[tokio::test]
async fn rsvp_validate_is_uniform_on_miss() {
    let server = spawn_app(None).await;
    server.create_guest("Sarah", "0412345678").await;

    let resp = server
        .client
        .post(server.url("/api/rsvp/validate"))
        .json(&json!({ "first_name": "Sarah", "passcode": "wrong99" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid name or passcode");

    let resp = server
        .client
        .post(server.url("/api/rsvp/validate"))
        .json(&json!({ "first_name": "Nobody", "passcode": "sara123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid name or passcode");
}

#[tokio::test]
async fn rsvp_flow_validates_and_submits() {
    let server = spawn_app(None).await;
    server.save_settings(None).await;
    let guest = server.create_guest("Sarah", "0412345678").await;
    let passcode = guest["passcode"].as_str().unwrap().to_string();

    // case-insensitive first name, no token required
    let resp = server
        .client
        .post(server.url("/api/rsvp/validate"))
        .json(&json!({ "first_name": "sArAh", "passcode": passcode }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let guest_id = body["guest"]["guest_id"].as_str().unwrap().to_string();
    assert_eq!(body["guest"]["rsvp_status"], "pending");
    assert_eq!(body["settings"]["couple_names"], "Sarah & James");

    let resp = server
        .client
        .post(server.url("/api/rsvp/submit"))
        .json(&json!({
            "guest_id": guest_id,
            "status": "attending",
            "number_attending": 3,
            "plus_one_names": ["Tom", "", "Jerry", "Extra"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "attending");
    assert_eq!(body["number_attending"], 3);

    // plus-ones replaced, capped at the allowance of 2, blanks discarded
    let resp = server.get("/api/guests").await;
    let list: Vec<Value> = resp.json().await.unwrap();
    let names: Vec<&str> = list[0]["plus_ones"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Tom", "Jerry"]);
    assert!(list[0]["rsvp"]["responded_at"].is_string());
}

#[tokio::test]
async fn rsvp_resubmission_updates_in_place() {
    let server = spawn_app(None).await;
    let guest = server.create_guest("Sarah", "0412345678").await;
    let guest_id = guest["id"].as_str().unwrap().to_string();

    for (status, n) in [("attending", json!(4)), ("not_attending", Value::Null)] {
        let resp = server
            .client
            .post(server.url("/api/rsvp/submit"))
            .json(&json!({ "guest_id": guest_id, "status": status, "number_attending": n }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let resp = server.get("/api/guests").await;
    let list: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(list[0]["rsvp"]["status"], "not_attending");
    assert_eq!(list[0]["rsvp"]["number_attending"], 0);
}

#[tokio::test]
async fn assignment_respects_capacity() {
    let server = spawn_app(None).await;

    let resp = server
        .post(
            "/api/tables",
            json!({ "name": "Table 1", "shape": "round", "capacity": 8 }),
        )
        .await;
    let table: Value = resp.json().await.unwrap();
    let table_id = table["id"].as_str().unwrap().to_string();

    // two attending parties of 3 and 4 leave one free seat
    let mut ids = Vec::new();
    for (name, phone, party) in [
        ("Alice", "0412000001", 3),
        ("Bob", "0412000002", 4),
        ("Cara", "0412000003", 2),
        ("Dan", "0412000004", 1),
    ] {
        let guest = server.create_guest(name, phone).await;
        let id = guest["id"].as_str().unwrap().to_string();
        let resp = server
            .client
            .post(server.url("/api/rsvp/submit"))
            .json(&json!({ "guest_id": id, "status": "attending", "number_attending": party }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        ids.push(id);
    }

    for id in &ids[..2] {
        let resp = server
            .post(
                "/api/assignments",
                json!({ "guest_id": id, "table_id": table_id }),
            )
            .await;
        assert_eq!(resp.status(), 200);
    }

    // party of 2 does not fit into the last seat
    let resp = server
        .post(
            "/api/assignments",
            json!({ "guest_id": ids[2], "table_id": table_id }),
        )
        .await;
    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("full"));

    // party of 1 does
    let resp = server
        .post(
            "/api/assignments",
            json!({ "guest_id": ids[3], "table_id": table_id }),
        )
        .await;
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn reassigning_to_the_same_table_is_not_double_counted() {
    let server = spawn_app(None).await;

    let resp = server
        .post(
            "/api/tables",
            json!({ "name": "Tiny", "shape": "round", "capacity": 4 }),
        )
        .await;
    let table: Value = resp.json().await.unwrap();
    let table_id = table["id"].as_str().unwrap().to_string();

    let guest = server.create_guest("Alice", "0412000001").await;
    let id = guest["id"].as_str().unwrap().to_string();
    server
        .client
        .post(server.url("/api/rsvp/submit"))
        .json(&json!({ "guest_id": id, "status": "attending", "number_attending": 4 }))
        .send()
        .await
        .unwrap();

    for _ in 0..2 {
        let resp = server
            .post(
                "/api/assignments",
                json!({ "guest_id": id, "table_id": table_id }),
            )
            .await;
        assert_eq!(resp.status(), 200);
    }

    let resp = server.get("/api/assignments").await;
    let list: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(list.len(), 1);
}

#[tokio::test]
async fn unassign_frees_the_seat() {
    let server = spawn_app(None).await;

    let resp = server
        .post("/api/tables", json!({ "name": "Table 1", "shape": "round" }))
        .await;
    let table: Value = resp.json().await.unwrap();
    let table_id = table["id"].as_str().unwrap().to_string();

    let guest = server.create_guest("Alice", "0412000001").await;
    let id = guest["id"].as_str().unwrap().to_string();

    let resp = server
        .post(
            "/api/assignments",
            json!({ "guest_id": id, "table_id": table_id }),
        )
        .await;
    assert_eq!(resp.status(), 200);

    let resp = server.delete(&format!("/api/assignments/{id}")).await;
    assert_eq!(resp.status(), 200);

    let resp = server.get("/api/assignments").await;
    let list: Vec<Value> = resp.json().await.unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn deleting_a_table_removes_its_assignments() {
    let server = spawn_app(None).await;

    let resp = server
        .post("/api/tables", json!({ "name": "Table 1", "shape": "round" }))
        .await;
    let table: Value = resp.json().await.unwrap();
    let table_id = table["id"].as_str().unwrap().to_string();

    let guest = server.create_guest("Alice", "0412000001").await;
    let id = guest["id"].as_str().unwrap().to_string();
    server
        .post(
            "/api/assignments",
            json!({ "guest_id": id, "table_id": table_id }),
        )
        .await;

    let resp = server.delete(&format!("/api/tables/{table_id}")).await;
    assert_eq!(resp.status(), 200);

    let resp = server.get("/api/assignments").await;
    let list: Vec<Value> = resp.json().await.unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn qr_lookup_unknown_code_is_404() {
    let server = spawn_app(None).await;

    let resp = server
        .client
        .get(server.url("/api/qr/WED_DOESNOTEXIST"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn stats_reflect_rsvps_and_seating() {
    let server = spawn_app(None).await;

    server
        .post("/api/tables", json!({ "name": "Table 1", "shape": "round" }))
        .await;

    let a = server.create_guest("Alice", "0412000001").await;
    server.create_guest("Bob", "0412000002").await;
    let a_id = a["id"].as_str().unwrap().to_string();
    server
        .client
        .post(server.url("/api/rsvp/submit"))
        .json(&json!({ "guest_id": a_id, "status": "attending", "number_attending": 3 }))
        .send()
        .await
        .unwrap();

    let resp = server.get("/api/stats").await;
    let stats: Value = resp.json().await.unwrap();
    assert_eq!(stats["total_guests"], 2);
    assert_eq!(stats["attending"], 1);
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["total_attending_headcount"], 3);
    assert_eq!(stats["tables"], 1);
    assert_eq!(stats["total_capacity"], 8);
}

#[tokio::test]
async fn guest_listing_joins_rsvp_and_table_assignment() {
    let server = spawn_app(None).await;

    let table: Value = server
        .post("/api/tables", json!({ "name": "Table 3", "shape": "round" }))
        .await
        .json()
        .await
        .unwrap();
    let guest = server.create_guest("Alice", "0412000001").await;
    let id = guest["id"].as_str().unwrap().to_string();

    let resp = server
        .post(
            "/api/assignments",
            json!({ "guest_id": id, "table_id": table["id"].as_str().unwrap() }),
        )
        .await;
    assert_eq!(resp.status(), 200);

    // joined children come back on the listing, not just the base row
    let resp = server.get("/api/guests").await;
    let guests: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(guests.len(), 1);
    assert_eq!(guests[0]["rsvp"]["status"], "pending");
    assert_eq!(guests[0]["table_assignment"]["table_name"], "Table 3");

    // and the assignments listing resolves both names
    let resp = server.get("/api/assignments").await;
    let assignments: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0]["guest_name"], "Alice");
    assert_eq!(assignments[0]["table_name"], "Table 3");
}

#[tokio::test]
async fn settings_image_kept_when_omitted_and_cleared_by_null() {
    let server = spawn_app(None).await;

    server.save_settings(Some("/images/invite.jpg")).await;

    // omitting the field keeps the stored image
    let kept = server.save_settings(None).await;
    assert_eq!(kept["invitation_image_url"], "/images/invite.jpg");

    // an explicit null clears it
    let resp = server
        .post(
            "/api/settings",
            json!({
                "couple_names": "Sarah & James",
                "wedding_date": "2026-03-14",
                "wedding_time": "17:30",
                "venue_name": "Harbourview Terrace",
                "invitation_image_url": null,
            }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let cleared: Value = resp.json().await.unwrap();
    assert!(cleared["invitation_image_url"].is_null());
}

#[tokio::test]
async fn floor_plan_background_kept_when_omitted_and_cleared_by_null() {
    let server = spawn_app(None).await;

    let resp = server
        .put(
            "/api/floor-plan",
            json!({ "background_image_url": "/images/venue.jpg" }),
        )
        .await;
    assert_eq!(resp.status(), 200);

    // a resize without the field keeps the image
    let resp = server.put("/api/floor-plan", json!({ "width": 1200 })).await;
    let plan: Value = resp.json().await.unwrap();
    assert_eq!(plan["width"], 1200);
    assert_eq!(plan["background_image_url"], "/images/venue.jpg");

    let resp = server
        .put("/api/floor-plan", json!({ "background_image_url": null }))
        .await;
    let plan: Value = resp.json().await.unwrap();
    assert!(plan["background_image_url"].is_null());
}
