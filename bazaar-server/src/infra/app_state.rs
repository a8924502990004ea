use std::{fmt, sync::Arc};

use bazaar_core::{AccountStore, CountryStore, InMemoryStore, PasswordHasher, TokenService};

/// Request-independent context shared by every handler. Built once at
/// startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub countries: Arc<dyn CountryStore>,
    pub tokens: Arc<TokenService>,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        countries: Arc<dyn CountryStore>,
        tokens: TokenService,
    ) -> Self {
        Self {
            accounts,
            countries,
            tokens: Arc::new(tokens),
            hasher: PasswordHasher::new(),
        }
    }

    /// Both ports served by one process-local store.
    pub fn in_memory(store: Arc<InMemoryStore>, tokens: TokenService) -> Self {
        Self::new(store.clone(), store, tokens)
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
