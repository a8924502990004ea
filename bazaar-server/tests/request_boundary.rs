use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::http::StatusCode;
use bazaar_core::{
    Account, AccountChanges, AccountStore, InMemoryStore, NewAccount, PasswordDigest,
};
use bazaar_server::infra::app_state::AppState;
use serde_json::json;
use uuid::Uuid;

#[path = "support/mod.rs"]
mod support;
use support::{bearer, build_server, signed_in, token_service};

/// Delegates to the in-memory store but blows up on `update`.
struct PanickingStore {
    inner: Arc<InMemoryStore>,
}

#[async_trait]
impl AccountStore for PanickingStore {
    async fn create(&self, account: NewAccount) -> bazaar_core::Result<Uuid> {
        self.inner.create(account).await
    }

    async fn get_by_username(&self, username: &str) -> bazaar_core::Result<Account> {
        self.inner.get_by_username(username).await
    }

    async fn get_by_id(&self, id: Uuid) -> bazaar_core::Result<Account> {
        self.inner.get_by_id(id).await
    }

    async fn update(&self, _id: Uuid, _changes: AccountChanges) -> bazaar_core::Result<()> {
        panic!("update exploded");
    }

    async fn update_password(&self, id: Uuid, digest: PasswordDigest) -> bazaar_core::Result<()> {
        self.inner.update_password(id, digest).await
    }

    async fn soft_delete(&self, id: Uuid) -> bazaar_core::Result<()> {
        self.inner.soft_delete(id).await
    }
}

#[tokio::test]
async fn panic_becomes_generic_500_and_server_keeps_serving() -> Result<()> {
    let inner = Arc::new(InMemoryStore::with_countries([support::COUNTRY]));
    let state = AppState::new(
        Arc::new(PanickingStore {
            inner: inner.clone(),
        }),
        inner,
        token_service(),
    );
    let server = build_server(state)?;
    let token = signed_in(&server, "TestUser").await;

    let response = server
        .put("/user/update")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "Phone": "123" }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "Error": "Internal server error" }));

    server.get("/test/alive").await.assert_status_ok();
    server
        .get("/test/auth")
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_ok();
    server
        .put("/user/update/password")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "NewPassword": "AnotherPassword" }))
        .await
        .assert_status_ok();
    Ok(())
}
