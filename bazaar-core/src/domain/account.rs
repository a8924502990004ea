use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Country, Ledger};
use crate::auth::PasswordDigest;

/// Identity record joined with its country and lifecycle ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub password_digest: PasswordDigest,
    pub email: String,
    /// Empty when the account holder never supplied one.
    pub phone: String,
    pub country: Country,
    pub ledger: Ledger,
}

impl Account {
    pub fn created_at(&self) -> DateTime<Utc> {
        self.ledger.created_at
    }

    pub fn is_active(&self) -> bool {
        self.ledger.is_active()
    }
}
