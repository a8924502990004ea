#![cfg(feature = "pg-tests")]

use anyhow::Result;
use bazaar_core::{
    AccountChanges, AccountStore, CountryStore, NewAccount, PasswordHasher, PostgresAccountStore,
    PostgresCountryStore, StoreError,
};
use sqlx::PgPool;
use uuid::Uuid;

async fn seed_countries(pool: &PgPool, names: &[&str]) -> Result<()> {
    for name in names {
        sqlx::query("INSERT INTO countries (id, name) VALUES ($1, $2)")
            .bind(Uuid::now_v7())
            .bind(*name)
            .execute(pool)
            .await?;
    }
    Ok(())
}

async fn count(pool: &PgPool, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    Ok(sqlx::query_scalar(&sql).fetch_one(pool).await?)
}

fn new_account(username: &str, country: &str) -> NewAccount {
    NewAccount {
        username: username.to_string(),
        password_digest: PasswordHasher::new().digest("correct-horse"),
        email: format!("{username}@example.com"),
        phone: String::new(),
        country_name: country.to_string(),
    }
}

#[sqlx::test(migrator = "bazaar_core::MIGRATOR")]
async fn create_persists_account_and_ledger(pool: PgPool) -> Result<()> {
    seed_countries(&pool, &["Norway"]).await?;
    let store = PostgresAccountStore::new(pool.clone());

    let id = store.create(new_account("kari", "Norway")).await?;
    let account = store.get_by_username("kari").await?;

    assert_eq!(account.id, id);
    assert_eq!(account.country.name, "Norway");
    assert!(account.is_active());
    assert!(account.ledger.updated_at.is_none());
    assert!(
        PasswordHasher::new().matches("correct-horse", &account.password_digest),
        "stored digest should verify"
    );
    assert_eq!(store.get_by_id(id).await?.username, "kari");
    Ok(())
}

#[sqlx::test(migrator = "bazaar_core::MIGRATOR")]
async fn duplicate_username_leaves_single_ledger(pool: PgPool) -> Result<()> {
    seed_countries(&pool, &["Norway"]).await?;
    let store = PostgresAccountStore::new(pool.clone());

    store.create(new_account("kari", "Norway")).await?;
    let err = store
        .create(new_account("kari", "Norway"))
        .await
        .expect_err("duplicate username must fail");

    assert_eq!(err, StoreError::Duplicate);
    assert_eq!(count(&pool, "accounts").await?, 1);
    assert_eq!(count(&pool, "account_ledgers").await?, 1);
    Ok(())
}

#[sqlx::test(migrator = "bazaar_core::MIGRATOR")]
async fn unknown_country_writes_nothing(pool: PgPool) -> Result<()> {
    let store = PostgresAccountStore::new(pool.clone());

    let err = store
        .create(new_account("kari", "Atlantis"))
        .await
        .expect_err("unknown country must fail");

    assert_eq!(err, StoreError::CountryNotFound);
    assert_eq!(count(&pool, "account_ledgers").await?, 0);
    Ok(())
}

#[sqlx::test(migrator = "bazaar_core::MIGRATOR")]
async fn update_rolls_back_when_country_is_unknown(pool: PgPool) -> Result<()> {
    seed_countries(&pool, &["Norway"]).await?;
    let store = PostgresAccountStore::new(pool.clone());
    let id = store.create(new_account("kari", "Norway")).await?;

    let changes = AccountChanges::from_fields("new@example.com".into(), String::new(), "Atlantis".into());
    let err = store
        .update(id, changes)
        .await
        .expect_err("unknown country must fail");

    assert_eq!(err, StoreError::CountryNotFound);
    let account = store.get_by_id(id).await?;
    assert_eq!(account.email, "kari@example.com");
    assert!(account.ledger.updated_at.is_none());
    Ok(())
}

#[sqlx::test(migrator = "bazaar_core::MIGRATOR")]
async fn update_writes_fields_and_touches_ledger(pool: PgPool) -> Result<()> {
    seed_countries(&pool, &["Norway", "Sweden"]).await?;
    let store = PostgresAccountStore::new(pool.clone());
    let id = store.create(new_account("kari", "Norway")).await?;

    store
        .update(id, AccountChanges::from_fields(String::new(), "+4712345678".into(), "Sweden".into()))
        .await?;

    let account = store.get_by_id(id).await?;
    assert_eq!(account.email, "kari@example.com");
    assert_eq!(account.phone, "+4712345678");
    assert_eq!(account.country.name, "Sweden");
    assert!(account.ledger.updated_at.is_some());
    Ok(())
}

#[sqlx::test(migrator = "bazaar_core::MIGRATOR")]
async fn update_reports_missing_account(pool: PgPool) -> Result<()> {
    let store = PostgresAccountStore::new(pool);

    let err = store
        .update(Uuid::now_v7(), AccountChanges::from_fields("a@b.io".into(), String::new(), String::new()))
        .await
        .expect_err("missing account must fail");

    assert_eq!(err, StoreError::NotFound);
    Ok(())
}

#[sqlx::test(migrator = "bazaar_core::MIGRATOR")]
async fn password_update_replaces_digest(pool: PgPool) -> Result<()> {
    seed_countries(&pool, &["Norway"]).await?;
    let store = PostgresAccountStore::new(pool.clone());
    let hasher = PasswordHasher::new();
    let id = store.create(new_account("kari", "Norway")).await?;

    store
        .update_password(id, hasher.digest("battery-staple"))
        .await?;

    let account = store.get_by_id(id).await?;
    assert!(hasher.matches("battery-staple", &account.password_digest));
    assert!(!hasher.matches("correct-horse", &account.password_digest));
    assert!(account.ledger.updated_at.is_some());
    Ok(())
}

#[sqlx::test(migrator = "bazaar_core::MIGRATOR")]
async fn soft_delete_keeps_row_and_tombstones_ledger(pool: PgPool) -> Result<()> {
    seed_countries(&pool, &["Norway"]).await?;
    let store = PostgresAccountStore::new(pool.clone());
    let id = store.create(new_account("kari", "Norway")).await?;

    store.soft_delete(id).await?;

    let account = store.get_by_id(id).await?;
    assert!(!account.is_active());
    assert!(account.ledger.deleted_at().is_some());
    assert_eq!(count(&pool, "accounts").await?, 1);
    Ok(())
}

#[sqlx::test(migrator = "bazaar_core::MIGRATOR")]
async fn countries_are_listed_by_name(pool: PgPool) -> Result<()> {
    seed_countries(&pool, &["Sweden", "Denmark", "Norway"]).await?;
    let store = PostgresCountryStore::new(pool);

    let names: Vec<String> = store.list().await?.into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["Denmark", "Norway", "Sweden"]);

    assert!(store.id_by_name("Norway").await.is_ok());
    assert_eq!(
        store.id_by_name("Atlantis").await,
        Err(StoreError::CountryNotFound)
    );
    Ok(())
}
