use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Whether the account owning a ledger is still usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Active,
    Tombstoned { at: DateTime<Utc> },
}

impl LifecycleState {
    pub fn from_deleted_at(deleted_at: Option<DateTime<Utc>>) -> Self {
        match deleted_at {
            Some(at) => LifecycleState::Tombstoned { at },
            None => LifecycleState::Active,
        }
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            LifecycleState::Active => None,
            LifecycleState::Tombstoned { at } => Some(*at),
        }
    }
}

/// Audit and soft-delete record paired with exactly one account.
///
/// The ledger is the only place an account's deletion is recorded: the account
/// row itself is never removed or altered when it is tombstoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Unset until the first mutation of the owning account.
    pub updated_at: Option<DateTime<Utc>>,
    pub state: LifecycleState,
}

impl Ledger {
    /// Opens a fresh ledger: created now, never mutated, active.
    pub fn open(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            created_at: now,
            updated_at: None,
            state: LifecycleState::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, LifecycleState::Active)
    }

    pub fn is_tombstoned(&self) -> bool {
        !self.is_active()
    }

    /// Records a mutation of the owning account.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }

    /// Marks the owning account as deleted.
    pub fn tombstone(&mut self, at: DateTime<Utc>) {
        self.state = LifecycleState::Tombstoned { at };
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.state.deleted_at()
    }
}
