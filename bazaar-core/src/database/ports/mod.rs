pub mod accounts;
pub mod countries;

pub use accounts::{AccountChanges, AccountStore, NewAccount};
pub use countries::CountryStore;
