#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum_test::TestServer;
use bazaar_core::{InMemoryStore, TokenService};
use bazaar_server::{infra::app_state::AppState, routes::create_router};
use serde_json::{Value, json};

pub const TOKEN_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const COUNTRY: &str = "TestCountry";
pub const PASSWORD: &str = "TestPassword";

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
    pub tokens: TokenService,
}

pub fn token_service() -> TokenService {
    TokenService::new(TOKEN_SECRET)
}

pub fn build_test_app() -> Result<TestApp> {
    let store = Arc::new(InMemoryStore::with_countries([COUNTRY, "OtherCountry"]));
    let state = AppState::in_memory(store.clone(), token_service());
    let server = build_server(state)?;

    Ok(TestApp {
        server,
        store,
        tokens: token_service(),
    })
}

pub fn build_server(state: AppState) -> Result<TestServer> {
    TestServer::builder()
        .build(create_router(state))
        .map_err(|err| anyhow!(err.to_string()))
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn signup_body(username: &str) -> Value {
    json!({
        "Username": username,
        "Password": PASSWORD,
        "Email": format!("{}@mail.test", username.to_lowercase()),
        "Phone": "87776665544",
        "Country": COUNTRY,
    })
}

pub async fn signup(server: &TestServer, username: &str) {
    server
        .post("/user/signup")
        .json(&signup_body(username))
        .await
        .assert_status_ok();
}

pub async fn login(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/user/login")
        .json(&json!({ "Username": username, "Password": password }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["Data"]["Token"]
        .as_str()
        .expect("token present")
        .to_string()
}

/// Signs up `username` and returns a fresh access token for it.
pub async fn signed_in(server: &TestServer, username: &str) -> String {
    signup(server, username).await;
    login(server, username, PASSWORD).await
}
