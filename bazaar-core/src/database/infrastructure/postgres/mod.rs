mod accounts;
mod countries;
mod ledger;

pub use accounts::PostgresAccountStore;
pub use countries::PostgresCountryStore;
