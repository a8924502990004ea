//! # Bazaar Core
//!
//! Core library for the Bazaar account service, providing the account domain
//! model, credential digests, bearer tokens and the transactional stores that
//! keep every account mutation paired with its lifecycle ledger.
//!
//! ## Overview
//!
//! - **Accounts**: identity records ([`domain::Account`]) bound 1:1 to a
//!   [`domain::Ledger`] that tracks creation, mutation and tombstone times
//! - **Credentials**: deterministic password digests ([`auth::PasswordHasher`])
//! - **Tokens**: short-lived signed bearer tokens ([`auth::TokenService`])
//! - **Stores**: the [`database::ports::AccountStore`] and
//!   [`database::ports::CountryStore`] ports with PostgreSQL and in-memory
//!   implementations
//!
//! ## Feature Flags
//!
//! - `postgres` (default): SQLx-backed stores and the bundled [`MIGRATOR`]
//! - `pg-tests`: enables the behaviour tests that need a live PostgreSQL

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Password digests and bearer tokens
pub mod auth;

/// Store ports and their implementations
pub mod database;

/// Account, country and lifecycle ledger types
pub mod domain;

/// Error types shared by the stores
pub mod error;

pub use auth::{PasswordDigest, PasswordHasher, TokenError, TokenService};
pub use database::infrastructure::memory::InMemoryStore;
pub use database::ports::{AccountChanges, AccountStore, CountryStore, NewAccount};
pub use domain::{Account, Country, Ledger, LifecycleState};
pub use error::{Result, StoreError};

#[cfg(feature = "postgres")]
pub use database::infrastructure::postgres::{PostgresAccountStore, PostgresCountryStore};

/// Schema migrations for the PostgreSQL stores.
#[cfg(feature = "postgres")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
