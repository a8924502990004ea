use thiserror::Error;

/// Failure reasons surfaced by the account and country stores.
///
/// The `Display` text of each variant is what callers report to clients, so
/// the messages are part of the wire contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Provided country does not exist")]
    CountryNotFound,

    #[error("duplicate key value violates unique constraint")]
    Duplicate,

    #[error("No record found")]
    NotFound,

    #[error("Nothing to update")]
    NothingToUpdate,

    #[error("{0}")]
    Database(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::Duplicate
            }
            other => StoreError::Database(other.to_string()),
        }
    }
}
