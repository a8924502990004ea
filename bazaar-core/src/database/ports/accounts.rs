use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::PasswordDigest;
use crate::domain::Account;
use crate::error::Result;

/// Everything needed to register an account. The password is already
/// digested; the country is the name as entered by the user.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_digest: PasswordDigest,
    pub email: String,
    pub phone: String,
    pub country_name: String,
}

/// Partial update of an account's mutable fields. `None` and empty strings
/// both mean "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountChanges {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub country_name: Option<String>,
}

impl AccountChanges {
    /// Builds a change set from raw request fields, dropping empty ones.
    pub fn from_fields(email: String, phone: String, country_name: String) -> Self {
        fn provided(value: String) -> Option<String> {
            (!value.is_empty()).then_some(value)
        }

        Self {
            email: provided(email),
            phone: provided(phone),
            country_name: provided(country_name),
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|v| !v.is_empty())
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref().filter(|v| !v.is_empty())
    }

    pub fn country_name(&self) -> Option<&str> {
        self.country_name.as_deref().filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.email().is_none() && self.phone().is_none() && self.country_name().is_none()
    }
}

/// Transactional account persistence. Every method is one atomic unit of
/// work: on error nothing it wrote is left behind.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Creates the account together with its ledger and returns its id.
    async fn create(&self, account: NewAccount) -> Result<Uuid>;

    async fn get_by_username(&self, username: &str) -> Result<Account>;

    async fn get_by_id(&self, id: Uuid) -> Result<Account>;

    /// Writes each provided field and refreshes the ledger's mutation time.
    async fn update(&self, id: Uuid, changes: AccountChanges) -> Result<()>;

    async fn update_password(&self, id: Uuid, digest: PasswordDigest) -> Result<()>;

    /// Tombstones the account's ledger. The account row is left untouched.
    async fn soft_delete(&self, id: Uuid) -> Result<()>;
}
