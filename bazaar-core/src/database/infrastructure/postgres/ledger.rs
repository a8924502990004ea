//! Ledger statements shared by the account store's units of work.
//!
//! Every function takes the open transaction's connection so the ledger write
//! commits or rolls back together with the account write it accompanies.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::domain::Ledger;
use crate::error::{Result, StoreError};

pub(super) async fn insert(conn: &mut PgConnection, ledger: &Ledger) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO account_ledgers (id, created_at, updated_at, deleted_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(ledger.id)
    .bind(ledger.created_at)
    .bind(ledger.updated_at)
    .bind(ledger.deleted_at())
    .execute(conn)
    .await?;

    Ok(())
}

/// Resolves the ledger owned by `account_id`; an unknown account is
/// [`StoreError::NotFound`].
pub(super) async fn id_for_account(conn: &mut PgConnection, account_id: Uuid) -> Result<Uuid> {
    let ledger_id: Option<Uuid> =
        sqlx::query_scalar("SELECT ledger_id FROM accounts WHERE id = $1")
            .bind(account_id)
            .fetch_optional(conn)
            .await?;

    ledger_id.ok_or(StoreError::NotFound)
}

pub(super) async fn touch(
    conn: &mut PgConnection,
    ledger_id: Uuid,
    at: DateTime<Utc>,
) -> Result<()> {
    let result = sqlx::query("UPDATE account_ledgers SET updated_at = $1 WHERE id = $2")
        .bind(at)
        .bind(ledger_id)
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub(super) async fn tombstone(
    conn: &mut PgConnection,
    ledger_id: Uuid,
    at: DateTime<Utc>,
) -> Result<()> {
    let result = sqlx::query("UPDATE account_ledgers SET deleted_at = $1 WHERE id = $2")
        .bind(at)
        .bind(ledger_id)
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}
