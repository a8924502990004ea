use anyhow::Result;
use axum::http::StatusCode;
use bazaar_core::{AccountStore, PasswordHasher};
use serde_json::json;

#[path = "support/mod.rs"]
mod support;
use support::{PASSWORD, bearer, build_test_app, login, signed_in};

#[tokio::test]
async fn update_writes_provided_fields_only() -> Result<()> {
    let app = build_test_app()?;
    let token = signed_in(&app.server, "TestUser").await;

    let response = app
        .server
        .put("/user/update")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "Phone": "+15550100", "Country": "OtherCountry" }))
        .await;
    response.assert_status_ok();
    response.assert_json(&json!({ "Data": "OK" }));

    let account = app.store.get_by_username("TestUser").await?;
    assert_eq!(account.email, "testuser@mail.test");
    assert_eq!(account.phone, "+15550100");
    assert_eq!(account.country.name, "OtherCountry");
    assert!(account.ledger.updated_at.is_some());
    Ok(())
}

#[tokio::test]
async fn update_with_nothing_set_is_rejected() -> Result<()> {
    let app = build_test_app()?;
    let token = signed_in(&app.server, "TestUser").await;

    let response = app
        .server
        .put("/user/update")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "Email": "", "Phone": "", "Country": "" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "Error": "Nothing to update" }));
    let account = app.store.get_by_username("TestUser").await?;
    assert!(account.ledger.updated_at.is_none());
    Ok(())
}

#[tokio::test]
async fn update_with_unknown_country_changes_nothing() -> Result<()> {
    let app = build_test_app()?;
    let token = signed_in(&app.server, "TestUser").await;

    let response = app
        .server
        .put("/user/update")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "Email": "new@mail.test", "Country": "Atlantis" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "Error": "Provided country does not exist" }));

    let account = app.store.get_by_username("TestUser").await?;
    assert_eq!(account.email, "testuser@mail.test");
    assert_eq!(account.country.name, "TestCountry");
    Ok(())
}

#[tokio::test]
async fn update_validates_email_when_present() -> Result<()> {
    let app = build_test_app()?;
    let token = signed_in(&app.server, "TestUser").await;

    let response = app
        .server
        .put("/user/update")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "Email": "broken" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "Error": "Data validation failed" }));
    Ok(())
}

#[tokio::test]
async fn password_change_takes_effect_for_login() -> Result<()> {
    let app = build_test_app()?;
    let token = signed_in(&app.server, "TestUser").await;

    app.server
        .put("/user/update/password")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "NewPassword": "BrandNewPassword" }))
        .await
        .assert_status_ok();

    let account = app.store.get_by_username("TestUser").await?;
    assert!(PasswordHasher::new().matches("BrandNewPassword", &account.password_digest));

    let old = app
        .server
        .post("/user/login")
        .json(&json!({ "Username": "TestUser", "Password": PASSWORD }))
        .await;
    old.assert_status(StatusCode::UNAUTHORIZED);

    login(&app.server, "TestUser", "BrandNewPassword").await;
    Ok(())
}

#[tokio::test]
async fn short_new_password_is_rejected() -> Result<()> {
    let app = build_test_app()?;
    let token = signed_in(&app.server, "TestUser").await;

    let response = app
        .server
        .put("/user/update/password")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "NewPassword": "tiny" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "Error": "Data validation failed" }));
    Ok(())
}

#[tokio::test]
async fn delete_tombstones_without_removing() -> Result<()> {
    let app = build_test_app()?;
    let token = signed_in(&app.server, "TestUser").await;

    let response = app
        .server
        .delete("/user/delete")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    response.assert_json(&json!({ "Data": "OK" }));

    assert_eq!(app.store.account_count(), 1);
    let account = app.store.get_by_username("TestUser").await?;
    assert!(!account.is_active());
    assert!(account.ledger.deleted_at().is_some());
    Ok(())
}

#[tokio::test]
async fn mutations_only_touch_the_token_holder() -> Result<()> {
    let app = build_test_app()?;
    let token = signed_in(&app.server, "Alice").await;
    signed_in(&app.server, "Bob").await;

    app.server
        .put("/user/update")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "Phone": "111" }))
        .await
        .assert_status_ok();

    let alice = app.store.get_by_username("Alice").await?;
    let bob = app.store.get_by_username("Bob").await?;
    assert_eq!(alice.phone, "111");
    assert_eq!(bob.phone, "87776665544");
    Ok(())
}
