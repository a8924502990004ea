use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row};
use uuid::Uuid;

use crate::database::ports::CountryStore;
use crate::domain::Country;
use crate::error::{Result, StoreError};

/// Resolves a country name inside an open transaction.
pub(super) async fn id_by_name_in(conn: &mut PgConnection, name: &str) -> Result<Uuid> {
    let id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM countries WHERE name = $1")
        .bind(name)
        .fetch_optional(conn)
        .await?;

    id.ok_or(StoreError::CountryNotFound)
}

#[derive(Clone, Debug)]
pub struct PostgresCountryStore {
    pool: PgPool,
}

impl PostgresCountryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CountryStore for PostgresCountryStore {
    async fn list(&self) -> Result<Vec<Country>> {
        let rows = sqlx::query("SELECT id, name FROM countries ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| -> Result<Country> {
                Ok(Country {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                })
            })
            .collect()
    }

    async fn id_by_name(&self, name: &str) -> Result<Uuid> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| StoreError::Database(format!("Failed to acquire connection: {e}")))?;

        id_by_name_in(&mut conn, name).await
    }
}
