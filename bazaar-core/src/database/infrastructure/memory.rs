//! Process-local implementation of both store ports.
//!
//! Each unit of work runs against a staged copy of the tables which replaces
//! the live tables only when the whole unit succeeds, so a failure at any
//! step leaves nothing behind. Used as the test double for the HTTP layer and
//! for running the service without PostgreSQL.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::auth::PasswordDigest;
use crate::database::ports::{AccountChanges, AccountStore, CountryStore, NewAccount};
use crate::domain::{Account, Country, Ledger};
use crate::error::{Result, StoreError};

#[derive(Debug, Clone)]
struct AccountRow {
    id: Uuid,
    username: String,
    password_digest: PasswordDigest,
    email: String,
    phone: String,
    country_id: Uuid,
    ledger_id: Uuid,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    countries: Vec<Country>,
    ledgers: HashMap<Uuid, Ledger>,
    accounts: HashMap<Uuid, AccountRow>,
}

impl Tables {
    fn country_id(&self, name: &str) -> Result<Uuid> {
        self.countries
            .iter()
            .find(|country| country.name == name)
            .map(|country| country.id)
            .ok_or(StoreError::CountryNotFound)
    }

    fn ledger_id_of(&self, account_id: Uuid) -> Result<Uuid> {
        self.accounts
            .get(&account_id)
            .map(|row| row.ledger_id)
            .ok_or(StoreError::NotFound)
    }

    fn ledger_mut(&mut self, ledger_id: Uuid) -> Result<&mut Ledger> {
        self.ledgers.get_mut(&ledger_id).ok_or(StoreError::NotFound)
    }

    fn join(&self, row: &AccountRow) -> Result<Account> {
        let country = self
            .countries
            .iter()
            .find(|country| country.id == row.country_id)
            .cloned()
            .ok_or(StoreError::NotFound)?;
        let ledger = self
            .ledgers
            .get(&row.ledger_id)
            .cloned()
            .ok_or(StoreError::NotFound)?;

        Ok(Account {
            id: row.id,
            username: row.username.clone(),
            password_digest: row.password_digest.clone(),
            email: row.email.clone(),
            phone: row.phone.clone(),
            country,
            ledger,
        })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the given country names.
    pub fn with_countries<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        for name in names {
            store.add_country(name);
        }
        store
    }

    /// Adds a reference country, returning the id of the existing entry when
    /// the name is already known.
    pub fn add_country(&self, name: impl Into<String>) -> Uuid {
        let name = name.into();
        let mut tables = self.tables.lock();
        if let Ok(id) = tables.country_id(&name) {
            return id;
        }
        let country = Country::new(name);
        let id = country.id;
        tables.countries.push(country);
        id
    }

    pub fn account_count(&self) -> usize {
        self.tables.lock().accounts.len()
    }

    pub fn ledger_count(&self) -> usize {
        self.tables.lock().ledgers.len()
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> Result<T>) -> Result<T> {
        let tables = self.tables.lock();
        f(&tables)
    }

    fn unit_of_work<T>(&self, f: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let mut live = self.tables.lock();
        let mut staged = live.clone();
        let out = f(&mut staged)?;
        *live = staged;
        Ok(out)
    }
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn create(&self, account: NewAccount) -> Result<Uuid> {
        let id = self.unit_of_work(|tables| {
            let country_id = tables.country_id(&account.country_name)?;

            let ledger = Ledger::open(Utc::now());
            let ledger_id = ledger.id;
            tables.ledgers.insert(ledger_id, ledger);

            if tables
                .accounts
                .values()
                .any(|row| row.username == account.username)
            {
                return Err(StoreError::Duplicate);
            }

            let id = Uuid::now_v7();
            tables.accounts.insert(
                id,
                AccountRow {
                    id,
                    username: account.username.clone(),
                    password_digest: account.password_digest.clone(),
                    email: account.email.clone(),
                    phone: account.phone.clone(),
                    country_id,
                    ledger_id,
                },
            );
            Ok(id)
        })?;

        info!("Created account: {} ({})", account.username, id);
        Ok(id)
    }

    async fn get_by_username(&self, username: &str) -> Result<Account> {
        self.read(|tables| {
            let row = tables
                .accounts
                .values()
                .find(|row| row.username == username)
                .ok_or(StoreError::NotFound)?;
            tables.join(row)
        })
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Account> {
        self.read(|tables| {
            let row = tables.accounts.get(&id).ok_or(StoreError::NotFound)?;
            tables.join(row)
        })
    }

    async fn update(&self, id: Uuid, changes: AccountChanges) -> Result<()> {
        if changes.is_empty() {
            return Err(StoreError::NothingToUpdate);
        }

        self.unit_of_work(|tables| {
            if let Some(email) = changes.email()
                && let Some(row) = tables.accounts.get_mut(&id)
            {
                row.email = email.to_string();
            }

            if let Some(phone) = changes.phone()
                && let Some(row) = tables.accounts.get_mut(&id)
            {
                row.phone = phone.to_string();
            }

            if let Some(name) = changes.country_name() {
                let country_id = tables.country_id(name)?;
                if let Some(row) = tables.accounts.get_mut(&id) {
                    row.country_id = country_id;
                }
            }

            let ledger_id = tables.ledger_id_of(id)?;
            tables.ledger_mut(ledger_id)?.touch(Utc::now());
            Ok(())
        })
    }

    async fn update_password(&self, id: Uuid, digest: PasswordDigest) -> Result<()> {
        self.unit_of_work(|tables| {
            if let Some(row) = tables.accounts.get_mut(&id) {
                row.password_digest = digest;
            }

            let ledger_id = tables.ledger_id_of(id)?;
            tables.ledger_mut(ledger_id)?.touch(Utc::now());
            Ok(())
        })
    }

    async fn soft_delete(&self, id: Uuid) -> Result<()> {
        self.unit_of_work(|tables| {
            let ledger_id = tables.ledger_id_of(id)?;
            tables.ledger_mut(ledger_id)?.tombstone(Utc::now());
            Ok(())
        })?;

        info!("Tombstoned account {}", id);
        Ok(())
    }
}

#[async_trait]
impl CountryStore for InMemoryStore {
    async fn list(&self) -> Result<Vec<Country>> {
        self.read(|tables| {
            let mut countries = tables.countries.clone();
            countries.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(countries)
        })
    }

    async fn id_by_name(&self, name: &str) -> Result<Uuid> {
        self.read(|tables| tables.country_id(name))
    }
}
