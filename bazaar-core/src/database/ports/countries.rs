use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Country;
use crate::error::Result;

// Read-only reference data
#[async_trait]
pub trait CountryStore: Send + Sync {
    /// All countries ordered by name.
    async fn list(&self) -> Result<Vec<Country>>;

    /// Resolves an exact country name, failing with
    /// [`StoreError::CountryNotFound`](crate::StoreError::CountryNotFound).
    async fn id_by_name(&self, name: &str) -> Result<Uuid>;
}
