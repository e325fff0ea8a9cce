//! Shared test harness: a full server on an ephemeral port backed by an
//! in-memory database, plus a reqwest client with an admin token.

use banquet_server::auth::JwtConfig;
use banquet_server::{Config, ServerState, api};
use serde_json::{Value, json};

pub const TEST_ACCOUNT: &str = "test-account";

pub struct TestServer {
    pub base_url: String,
    pub token: String,
    pub client: reqwest::Client,
    pub state: ServerState,
    // Dropped with the server; keeps the work dir alive for the test
    _work_dir: tempfile::TempDir,
}

pub fn test_config(work_dir: &str, base_url: &str, gateway_url: Option<&str>) -> Config {
    Config {
        work_dir: work_dir.to_string(),
        http_port: 0,
        app_base_url: base_url.to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret-thirty-two-bytes!".to_string(),
            expiration_minutes: 60,
        },
        environment: "development".to_string(),
        clicksend_username: gateway_url.map(|_| "test-user".to_string()),
        clicksend_api_key: gateway_url.map(|_| "test-key".to_string()),
        clicksend_api_url: gateway_url
            .unwrap_or("https://rest.clicksend.com/v3")
            .to_string(),
    }
}

/// Spawn the app on an ephemeral port; `gateway_url` points messaging at a
/// mock gateway when given
pub async fn spawn_app(gateway_url: Option<&str>) -> TestServer {
    let work_dir = tempfile::tempdir().expect("tempdir");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let base_url = format!("http://{addr}");

    let config = test_config(work_dir.path().to_str().unwrap(), &base_url, gateway_url);
    let state = ServerState::initialize_memory(config)
        .await
        .expect("state init");

    let token = state
        .jwt
        .generate_token("user:admin", TEST_ACCOUNT)
        .expect("token");

    let app = api::build_app(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    TestServer {
        base_url,
        token,
        client: reqwest::Client::new(),
        state,
        _work_dir: work_dir,
    }
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await
            .expect("request")
    }

    pub async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .expect("request")
    }

    pub async fn put(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .expect("request")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await
            .expect("request")
    }

    /// Create a guest and return the response JSON
    pub async fn create_guest(&self, first_name: &str, phone: &str) -> Value {
        let resp = self
            .post(
                "/api/guests",
                json!({
                    "first_name": first_name,
                    "phone": phone,
                    "plus_ones_allowed": 2,
                    "plus_ones": [],
                }),
            )
            .await;
        assert_eq!(resp.status(), 200, "guest creation failed");
        resp.json().await.expect("json")
    }

    /// Save minimal wedding settings, optionally with an invitation image
    pub async fn save_settings(&self, invitation_image_url: Option<&str>) -> Value {
        let mut body = json!({
            "couple_names": "Sarah & James",
            "wedding_date": "2026-03-14",
            "wedding_time": "17:30",
            "venue_name": "Harbourview Terrace",
        });
        if let Some(url) = invitation_image_url {
            body["invitation_image_url"] = json!(url);
        }
        let resp = self.post("/api/settings", body).await;
        assert_eq!(resp.status(), 200, "settings upsert failed");
        resp.json().await.expect("json")
    }
}
