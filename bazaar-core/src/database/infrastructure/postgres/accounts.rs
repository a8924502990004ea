use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::{countries, ledger};
use crate::auth::PasswordDigest;
use crate::database::ports::{AccountChanges, AccountStore, NewAccount};
use crate::domain::{Account, Country, Ledger, LifecycleState};
use crate::error::{Result, StoreError};

const SELECT_ACCOUNT: &str = r#"
    SELECT
        a.id,
        a.username,
        a.password_digest,
        a.email,
        a.phone,
        c.id AS country_id,
        c.name AS country_name,
        l.id AS ledger_id,
        l.created_at,
        l.updated_at,
        l.deleted_at
    FROM accounts a
    JOIN countries c ON c.id = a.country_id
    JOIN account_ledgers l ON l.id = a.ledger_id
"#;

/// PostgreSQL-backed implementation of the [`AccountStore`] port.
#[derive(Clone, Debug)]
pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        self.pool()
            .begin()
            .await
            .map_err(|e| StoreError::Database(format!("Failed to start transaction: {e}")))
    }

    async fn commit(tx: Transaction<'static, Postgres>) -> Result<()> {
        tx.commit()
            .await
            .map_err(|e| StoreError::Database(format!("Failed to commit transaction: {e}")))
    }

    fn map_row(row: &PgRow) -> Result<Account> {
        let deleted_at: Option<DateTime<Utc>> = row.try_get("deleted_at")?;

        Ok(Account {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_digest: PasswordDigest::from_stored(
                row.try_get::<String, _>("password_digest")?,
            ),
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            country: Country {
                id: row.try_get("country_id")?,
                name: row.try_get("country_name")?,
            },
            ledger: Ledger {
                id: row.try_get("ledger_id")?,
                created_at: row.try_get("created_at")?,
                updated_at: row.try_get("updated_at")?,
                state: LifecycleState::from_deleted_at(deleted_at),
            },
        })
    }

    fn expect_row(row: Option<PgRow>) -> Result<Account> {
        let row = row.ok_or(StoreError::NotFound)?;
        Self::map_row(&row)
    }
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn create(&self, account: NewAccount) -> Result<Uuid> {
        let mut tx = self.begin().await?;

        let country_id = countries::id_by_name_in(&mut tx, &account.country_name).await?;

        let entry = Ledger::open(Utc::now());
        ledger::insert(&mut tx, &entry).await?;

        let id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, username, password_digest, email, phone, country_id, ledger_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(&account.username)
        .bind(account.password_digest.as_str())
        .bind(&account.email)
        .bind(&account.phone)
        .bind(country_id)
        .bind(entry.id)
        .execute(&mut *tx)
        .await?;

        Self::commit(tx).await?;

        info!("Created account: {} ({})", account.username, id);
        Ok(id)
    }

    async fn get_by_username(&self, username: &str) -> Result<Account> {
        let sql = format!("{SELECT_ACCOUNT} WHERE a.username = $1");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(self.pool())
            .await?;

        Self::expect_row(row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Account> {
        let sql = format!("{SELECT_ACCOUNT} WHERE a.id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Self::expect_row(row)
    }

    async fn update(&self, id: Uuid, changes: AccountChanges) -> Result<()> {
        if changes.is_empty() {
            return Err(StoreError::NothingToUpdate);
        }

        let mut tx = self.begin().await?;

        if let Some(email) = changes.email() {
            sqlx::query("UPDATE accounts SET email = $1 WHERE id = $2")
                .bind(email)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(phone) = changes.phone() {
            sqlx::query("UPDATE accounts SET phone = $1 WHERE id = $2")
                .bind(phone)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(name) = changes.country_name() {
            let country_id = countries::id_by_name_in(&mut tx, name).await?;
            sqlx::query("UPDATE accounts SET country_id = $1 WHERE id = $2")
                .bind(country_id)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        let ledger_id = ledger::id_for_account(&mut tx, id).await?;
        ledger::touch(&mut tx, ledger_id, Utc::now()).await?;

        Self::commit(tx).await?;

        info!("Updated account {}", id);
        Ok(())
    }

    async fn update_password(&self, id: Uuid, digest: PasswordDigest) -> Result<()> {
        let mut tx = self.begin().await?;

        sqlx::query("UPDATE accounts SET password_digest = $1 WHERE id = $2")
            .bind(digest.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let ledger_id = ledger::id_for_account(&mut tx, id).await?;
        ledger::touch(&mut tx, ledger_id, Utc::now()).await?;

        Self::commit(tx).await?;

        info!("Updated password for account {}", id);
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.begin().await?;

        let ledger_id = ledger::id_for_account(&mut tx, id).await?;
        ledger::tombstone(&mut tx, ledger_id, Utc::now()).await?;

        Self::commit(tx).await?;

        info!("Tombstoned account {}", id);
        Ok(())
    }
}
